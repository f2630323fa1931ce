use crate::engine::Principal;
use crate::error::TranslationError;
use crate::request::CanonicalRequest;
use crate::response::CapturedResponse;
use http::Extensions;

/// Reply handed back to the platform entrypoint.
///
/// `AlternateReply` marks a reply the platform must surface through its
/// error channel (for example a non-200 integration response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformResult<R> {
    DefaultReply(R),
    AlternateReply(R),
}

impl<R> PlatformResult<R> {
    pub fn is_alternate(&self) -> bool {
        matches!(self, PlatformResult::AlternateReply(_))
    }

    pub fn reply(&self) -> &R {
        match self {
            PlatformResult::DefaultReply(reply) | PlatformResult::AlternateReply(reply) => reply,
        }
    }

    pub fn into_inner(self) -> R {
        match self {
            PlatformResult::DefaultReply(reply) | PlatformResult::AlternateReply(reply) => reply,
        }
    }

    pub fn map<U, F>(self, f: F) -> PlatformResult<U>
    where
        F: FnOnce(R) -> U,
    {
        match self {
            PlatformResult::DefaultReply(reply) => PlatformResult::DefaultReply(f(reply)),
            PlatformResult::AlternateReply(reply) => PlatformResult::AlternateReply(f(reply)),
        }
    }
}

/// Facts about the final response that only the controller knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyFlags {
    /// The body was base64-transcoded.
    pub platform_binary: bool,
    /// The request was cross-origin and failed the CORS check.
    pub cors_failed: bool,
}

/// Converts one platform's invocation shape to and from the canonical
/// request/response.
pub trait PlatformTranslator: Send + Sync {
    type Event;
    type Reply;

    fn to_canonical_request(
        &self,
        event: &Self::Event,
    ) -> Result<CanonicalRequest, TranslationError>;

    fn principal(&self, _event: &Self::Event) -> Option<Principal> {
        None
    }

    /// Copies platform values into the engine's per-request extensions.
    fn enrich(&self, _event: &Self::Event, _extensions: &mut Extensions) {}

    fn to_platform_reply(
        &self,
        response: &CapturedResponse,
        flags: &ReplyFlags,
    ) -> PlatformResult<Self::Reply>;
}

#[cfg(test)]
#[path = "translator_test.rs"]
mod translator_test;

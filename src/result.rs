use crate::headers::HeaderMap;
use crate::origin::RequestOrigin;
use std::fmt;

/// Why a cross-origin request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidOrigin,
    InvalidRequestMethod,
    OriginNotAllowed,
    MethodNotAllowed,
    HeadersNotAllowed,
}

impl RejectReason {
    /// Terminal rejections are answered with 403 instead of being dispatched.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RejectReason::InvalidOrigin | RejectReason::InvalidRequestMethod
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            RejectReason::InvalidOrigin => "invalid origin",
            RejectReason::InvalidRequestMethod => "invalid access-control-request-method",
            RejectReason::OriginNotAllowed => "origin not allowed",
            RejectReason::MethodNotAllowed => "method not allowed",
            RejectReason::HeadersNotAllowed => "headers not allowed",
        };
        f.write_str(reason)
    }
}

/// Result of the request-side CORS filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOutcome {
    NotCors,
    SameOrigin,
    PreflightApproved(HeaderMap),
    PreflightRejected(RejectReason),
    ActualApproved(RequestOrigin),
    ActualRejected(RejectReason),
}

impl CorsOutcome {
    /// True when response headers must not be added to the dispatched response.
    pub fn is_cors_failed(&self) -> bool {
        matches!(self, CorsOutcome::ActualRejected(_))
    }

    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            CorsOutcome::PreflightApproved(_) | CorsOutcome::PreflightRejected(_)
        )
    }
}

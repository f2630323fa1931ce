use crate::constants::header;
use crate::headers::HeaderMap;
use crate::response::{CapturedResponse, EntityKind};
use crate::util::is_binary_media_type;
use serde::{Deserialize, Serialize};

/// Controls when non-binary responses may travel compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinaryPolicy {
    /// Only binary entities may keep a `Content-Encoding`.
    pub non_binary_compression_only: bool,
}

impl Default for BinaryPolicy {
    fn default() -> Self {
        Self {
            non_binary_compression_only: true,
        }
    }
}

/// Outcome of classifying a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BinaryDecision {
    /// The body has to be base64-transcoded for the platform.
    pub platform_binary: bool,
    /// `Content-Encoding` must be dropped so the body goes out uncompressed.
    pub strip_content_encoding: bool,
}

impl BinaryPolicy {
    /// Entity kinds decide on their own, except raw buffers which are judged
    /// by their `Content-Type` and whether the bytes are valid UTF-8.
    pub fn classify(&self, response: &CapturedResponse) -> BinaryDecision {
        let binary = match response.kind {
            EntityKind::Buffer => is_binary_buffer(&response.headers, &response.body),
            kind => kind.is_binary(),
        };
        let compressed = response.headers.contains(header::CONTENT_ENCODING);

        BinaryDecision {
            platform_binary: binary || (compressed && !self.non_binary_compression_only),
            strip_content_encoding: compressed && !binary && self.non_binary_compression_only,
        }
    }

    /// Classifies the response and strips `Content-Encoding` when required.
    pub fn apply(&self, response: &mut CapturedResponse) -> BinaryDecision {
        let decision = self.classify(response);
        if decision.strip_content_encoding {
            tracing::debug!("dropping content-encoding from non-binary response");
            response.headers.remove(header::CONTENT_ENCODING);
        }
        decision
    }
}

fn is_binary_buffer(headers: &HeaderMap, body: &[u8]) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .is_some_and(is_binary_media_type)
        || std::str::from_utf8(body).is_err()
}

#[cfg(test)]
#[path = "binary_test.rs"]
mod binary_test;

use crate::constants::header;
use crate::error::TranslationError;
use crate::gateway::DEFAULT_AUTHORITY;
use crate::headers::HeaderMap;
use crate::request::{CanonicalRequest, authority_root, compose_uri};
use crate::response::CapturedResponse;
use crate::translator::{PlatformResult, PlatformTranslator, ReplyFlags};
use crate::util::is_binary_media_type;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw web action payload. The platform base64-encodes `__ow_body` whenever
/// the request content type is binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebActionEvent {
    #[serde(rename = "__ow_method")]
    pub method: Option<String>,
    #[serde(rename = "__ow_headers")]
    pub headers: IndexMap<String, String>,
    #[serde(rename = "__ow_path")]
    pub path: Option<String>,
    #[serde(rename = "__ow_query")]
    pub query: Option<String>,
    #[serde(rename = "__ow_body")]
    pub body: Option<String>,
}

/// A header is a plain string unless it carries several values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebHeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebActionReply {
    pub status_code: u16,
    pub headers: IndexMap<String, WebHeaderValue>,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct WebActionTranslator {
    default_authority: String,
}

impl Default for WebActionTranslator {
    fn default() -> Self {
        Self {
            default_authority: DEFAULT_AUTHORITY.to_string(),
        }
    }
}

impl WebActionTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_authority(mut self, authority: impl Into<String>) -> Self {
        self.default_authority = authority.into();
        self
    }
}

impl PlatformTranslator for WebActionTranslator {
    type Event = WebActionEvent;
    type Reply = WebActionReply;

    fn to_canonical_request(
        &self,
        event: &WebActionEvent,
    ) -> Result<CanonicalRequest, TranslationError> {
        let method = event
            .method
            .as_deref()
            .ok_or(TranslationError::MissingField("__ow_method"))?;
        let headers: HeaderMap = event
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let root = authority_root(&headers, &self.default_authority);
        let path = event
            .path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or("/");
        let mut uri = compose_uri(&root, path, std::iter::empty())?;
        if let Some(query) = event.query.as_deref().filter(|query| !query.is_empty()) {
            uri.set_query(Some(query));
        }

        let binary = headers
            .get(header::CONTENT_TYPE)
            .is_some_and(is_binary_media_type);
        let mut builder = CanonicalRequest::builder()
            .method(method)
            .request_uri(uri)
            .headers(headers);
        if let Some(body) = event.body.as_deref().filter(|body| !body.is_empty()) {
            builder = if binary {
                builder.body(STANDARD.decode(body)?)
            } else {
                builder.body(body.as_bytes())
            };
        }

        builder.build()
    }

    fn enrich(&self, event: &WebActionEvent, extensions: &mut Extensions) {
        extensions.insert(event.clone());
    }

    fn to_platform_reply(
        &self,
        response: &CapturedResponse,
        _flags: &ReplyFlags,
    ) -> PlatformResult<WebActionReply> {
        let headers = response
            .headers
            .iter()
            .map(|(name, values)| {
                let value = match values {
                    [single] => WebHeaderValue::Single(single.clone()),
                    many => WebHeaderValue::Multiple(many.to_vec()),
                };
                (name.to_string(), value)
            })
            .collect();

        PlatformResult::DefaultReply(WebActionReply {
            status_code: response.status,
            headers,
            body: response.body_text(),
        })
    }
}

#[cfg(test)]
#[path = "web_action_test.rs"]
mod web_action_test;

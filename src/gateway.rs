use crate::engine::Principal;
use crate::error::TranslationError;
use crate::headers::HeaderMap;
use crate::request::{CanonicalRequest, authority_root, compose_uri};
use crate::response::CapturedResponse;
use crate::translator::{PlatformResult, PlatformTranslator, ReplyFlags};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_AUTHORITY: &str = "localhost";

/// Proxy-style gateway event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayProxyEvent {
    pub http_method: Option<String>,
    pub path: Option<String>,
    pub headers: Option<IndexMap<String, String>>,
    pub multi_value_headers: Option<IndexMap<String, Vec<String>>>,
    pub query_string_parameters: Option<IndexMap<String, String>>,
    pub multi_value_query_string_parameters: Option<IndexMap<String, Vec<String>>>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
    pub request_context: Option<GatewayRequestContext>,
    pub stage_variables: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayRequestContext {
    pub stage: Option<String>,
    pub request_id: Option<String>,
    pub resource_path: Option<String>,
    pub identity: Option<GatewayIdentity>,
    pub authorizer: Option<IndexMap<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayIdentity {
    pub source_ip: Option<String>,
    pub user_agent: Option<String>,
}

impl GatewayProxyEvent {
    /// Multi-value headers win; single-value headers fill in missing names.
    pub fn header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(multi) = &self.multi_value_headers {
            for (name, values) in multi {
                for value in values {
                    headers.append(name.as_str(), value.as_str());
                }
            }
        }
        if let Some(single) = &self.headers {
            for (name, value) in single {
                if !headers.contains(name) {
                    headers.append(name.as_str(), value.as_str());
                }
            }
        }
        headers
    }

    fn query_pairs(&self) -> Vec<(&str, &str)> {
        if let Some(multi) = &self.multi_value_query_string_parameters
            && !multi.is_empty()
        {
            return multi
                .iter()
                .flat_map(|(name, values)| {
                    values
                        .iter()
                        .map(move |value| (name.as_str(), value.as_str()))
                })
                .collect();
        }

        self.query_string_parameters
            .iter()
            .flatten()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayProxyReply {
    pub status_code: u16,
    /// First value of every header.
    pub headers: IndexMap<String, String>,
    pub multi_value_headers: IndexMap<String, Vec<String>>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

/// How a reply is surfaced to the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyMode {
    /// Every reply is returned as the proxy result.
    #[default]
    Proxy,
    /// Non-200 replies go through the platform's error channel.
    Integration,
}

#[derive(Debug, Clone)]
pub struct GatewayProxyTranslator {
    default_authority: String,
    mode: ReplyMode,
}

impl Default for GatewayProxyTranslator {
    fn default() -> Self {
        Self {
            default_authority: DEFAULT_AUTHORITY.to_string(),
            mode: ReplyMode::Proxy,
        }
    }
}

impl GatewayProxyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority used when the event carries no `Host` header.
    pub fn with_default_authority(mut self, authority: impl Into<String>) -> Self {
        self.default_authority = authority.into();
        self
    }

    pub fn with_mode(mut self, mode: ReplyMode) -> Self {
        self.mode = mode;
        self
    }
}

impl PlatformTranslator for GatewayProxyTranslator {
    type Event = GatewayProxyEvent;
    type Reply = GatewayProxyReply;

    fn to_canonical_request(
        &self,
        event: &GatewayProxyEvent,
    ) -> Result<CanonicalRequest, TranslationError> {
        let method = event
            .http_method
            .as_deref()
            .ok_or(TranslationError::MissingField("httpMethod"))?;
        let headers = event.header_map();
        let root = authority_root(&headers, &self.default_authority);
        let path = event
            .path
            .as_deref()
            .filter(|path| !path.is_empty())
            .unwrap_or("/");
        let uri = compose_uri(&root, path, event.query_pairs())?;

        let mut builder = CanonicalRequest::builder()
            .method(method)
            .request_uri(uri)
            .headers(headers);

        if let Some(body) = &event.body {
            builder = if event.is_base64_encoded {
                builder.body(STANDARD.decode(body)?)
            } else {
                builder.body(body.as_bytes())
            };
        }
        if let Some(context) = &event.request_context {
            builder = builder.context(context.clone());
        }

        builder.build()
    }

    fn principal(&self, event: &GatewayProxyEvent) -> Option<Principal> {
        let authorizer = event.request_context.as_ref()?.authorizer.as_ref()?;
        let name = authorizer.get("principalId")?.as_str()?;

        let mut principal = Principal::new(name);
        let claims = match authorizer.get("claims") {
            Some(Value::Object(claims)) => claims.iter().collect::<Vec<_>>(),
            _ => authorizer
                .iter()
                .filter(|(key, _)| key.as_str() != "principalId")
                .collect(),
        };
        for (key, value) in claims {
            if let Some(value) = value.as_str() {
                principal = principal.with_claim(key.as_str(), value);
            }
        }
        Some(principal)
    }

    fn enrich(&self, event: &GatewayProxyEvent, extensions: &mut Extensions) {
        extensions.insert(event.clone());
    }

    fn to_platform_reply(
        &self,
        response: &CapturedResponse,
        flags: &ReplyFlags,
    ) -> PlatformResult<GatewayProxyReply> {
        let mut reply = GatewayProxyReply {
            status_code: response.status,
            is_base64_encoded: flags.platform_binary,
            body: (!response.body.is_empty()).then(|| response.body_text()),
            ..GatewayProxyReply::default()
        };
        for (name, values) in response.headers.iter() {
            if let Some(first) = values.first() {
                reply.headers.insert(name.to_string(), first.clone());
            }
            reply
                .multi_value_headers
                .insert(name.to_string(), values.to_vec());
        }

        match self.mode {
            ReplyMode::Integration if response.status != 200 => {
                PlatformResult::AlternateReply(reply)
            }
            _ => PlatformResult::DefaultReply(reply),
        }
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

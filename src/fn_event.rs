use crate::error::TranslationError;
use crate::headers::HeaderMap;
use crate::request::CanonicalRequest;
use crate::response::CapturedResponse;
use crate::translator::{PlatformResult, PlatformTranslator, ReplyFlags};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Body encodings a function platform may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    #[default]
    #[serde(alias = "utf-8", alias = "utf8")]
    Text,
    Base64,
}

/// Input event of a function platform that already carries a full request url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionEvent {
    pub method: Option<String>,
    pub request_url: Option<String>,
    pub headers: IndexMap<String, Vec<String>>,
    pub body: Option<String>,
    pub body_encoding: BodyEncoding,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionReply {
    pub status: u16,
    pub headers: IndexMap<String, Vec<String>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionEventTranslator;

impl PlatformTranslator for FunctionEventTranslator {
    type Event = FunctionEvent;
    type Reply = FunctionReply;

    fn to_canonical_request(
        &self,
        event: &FunctionEvent,
    ) -> Result<CanonicalRequest, TranslationError> {
        let method = event
            .method
            .as_deref()
            .ok_or(TranslationError::MissingField("method"))?;
        let url = event
            .request_url
            .as_deref()
            .ok_or(TranslationError::MissingField("requestUrl"))?;
        let body = event
            .body
            .as_deref()
            .ok_or(TranslationError::MissingField("body"))?;
        let body = match event.body_encoding {
            BodyEncoding::Base64 => STANDARD.decode(body)?,
            BodyEncoding::Text => body.as_bytes().to_vec(),
        };

        let headers: HeaderMap = event
            .headers
            .iter()
            .flat_map(|(name, values)| {
                values
                    .iter()
                    .map(move |value| (name.as_str(), value.as_str()))
            })
            .collect();

        CanonicalRequest::builder()
            .method(method)
            .request_uri(url)
            .headers(headers)
            .body(body)
            .build()
    }

    fn enrich(&self, event: &FunctionEvent, extensions: &mut Extensions) {
        extensions.insert(event.clone());
    }

    fn to_platform_reply(
        &self,
        response: &CapturedResponse,
        flags: &ReplyFlags,
    ) -> PlatformResult<FunctionReply> {
        PlatformResult::DefaultReply(FunctionReply {
            status: response.status,
            headers: response
                .headers
                .iter()
                .map(|(name, values)| (name.to_string(), values.to_vec()))
                .collect(),
            body: response.body_text(),
            is_base64_encoded: flags.platform_binary,
        })
    }
}

#[cfg(test)]
#[path = "fn_event_test.rs"]
mod fn_event_test;

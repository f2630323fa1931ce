use crate::constants::{header, media_type, method};
use crate::error::TranslationError;
use crate::gateway::DEFAULT_AUTHORITY;
use crate::request::{CanonicalRequest, compose_uri};
use crate::response::CapturedResponse;
use crate::translator::{PlatformResult, PlatformTranslator, ReplyFlags};
use crate::util::equals_ignore_case;
use http::Extensions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Batch of delivery records as handed to the function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PubSubEvent {
    pub records: Vec<PubSubRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PubSubRecord {
    pub event_source: Option<String>,
    pub event_version: Option<String>,
    pub event_subscription_arn: Option<String>,
    pub sns: Option<PubSubMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PubSubMessage {
    pub r#type: Option<String>,
    pub message_id: Option<String>,
    pub topic_arn: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub timestamp: Option<String>,
    pub message_attributes: IndexMap<String, MessageAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MessageAttribute {
    pub r#type: Option<String>,
    pub value: Option<String>,
}

impl PubSubMessage {
    /// Name after the last `:` of the topic ARN.
    pub fn topic_name(&self) -> Option<&str> {
        let arn = self.topic_arn.as_deref()?;
        arn.rsplit(':').next().filter(|name| !name.is_empty())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.message_attributes
            .iter()
            .find(|(key, _)| equals_ignore_case(key, name))
            .and_then(|(_, attribute)| attribute.value.as_deref())
    }
}

/// Acknowledgement returned for a delivered record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubAck {
    pub status: u16,
    pub reason: Option<String>,
    pub success: bool,
}

/// Delivers each record as `POST /{topic}[/{subject}]`.
#[derive(Debug, Clone)]
pub struct PubSubTranslator {
    authority: String,
}

impl Default for PubSubTranslator {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
        }
    }
}

impl PubSubTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }
}

impl PlatformTranslator for PubSubTranslator {
    type Event = PubSubRecord;
    type Reply = PubSubAck;

    fn to_canonical_request(
        &self,
        record: &PubSubRecord,
    ) -> Result<CanonicalRequest, TranslationError> {
        let message = record.sns.as_ref().ok_or(TranslationError::MissingField("Sns"))?;
        if message.message_id.is_none() {
            return Err(TranslationError::MissingField("MessageId"));
        }
        let topic = message
            .topic_name()
            .ok_or(TranslationError::MissingField("TopicArn"))?;

        let path = match message.subject.as_deref().map(str::trim) {
            Some(subject) if !subject.is_empty() => format!("/{topic}/{subject}"),
            _ => format!("/{topic}"),
        };
        let uri = compose_uri(
            &format!("https://{}", self.authority),
            &path,
            std::iter::empty(),
        )?;
        let content_type = message
            .attribute(header::CONTENT_TYPE)
            .unwrap_or(media_type::APPLICATION_JSON);

        let mut builder = CanonicalRequest::builder()
            .method(method::POST)
            .request_uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .context(message.clone());
        if let Some(body) = &message.message {
            builder = builder.body(body.as_bytes());
        }
        builder.build()
    }

    fn enrich(&self, record: &PubSubRecord, extensions: &mut Extensions) {
        extensions.insert(record.clone());
    }

    fn to_platform_reply(
        &self,
        response: &CapturedResponse,
        _flags: &ReplyFlags,
    ) -> PlatformResult<PubSubAck> {
        let ack = PubSubAck {
            status: response.status,
            reason: response.reason_phrase().map(str::to_string),
            success: response.is_success(),
        };

        if ack.success {
            PlatformResult::DefaultReply(ack)
        } else {
            tracing::warn!(status = ack.status, "record was not accepted by the engine");
            PlatformResult::AlternateReply(ack)
        }
    }
}

#[cfg(test)]
#[path = "pubsub_test.rs"]
mod pubsub_test;

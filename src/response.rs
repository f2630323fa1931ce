use crate::constants::status;
use crate::headers::HeaderMap;
use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

pub type PushWriterFn = dyn FnOnce(&mut dyn Write) -> io::Result<()> + Send;

/// A producer of binary content with its own media type, such as an attachment.
pub trait DataSource: Send {
    fn content_type(&self) -> Option<&str> {
        None
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>>;
}

/// Response payload as produced by the engine, before it is written out.
pub enum Entity {
    Empty,
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    File(PathBuf),
    /// Push-style writer invoked once with the output buffer.
    Streaming(Box<PushWriterFn>),
    Reader(Box<dyn Read + Send>),
    DataSource(Box<dyn DataSource>),
}

impl Entity {
    pub fn streaming<F>(writer: F) -> Self
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()> + Send + 'static,
    {
        Self::Streaming(Box::new(writer))
    }

    pub fn reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::Reader(Box::new(reader))
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Empty => EntityKind::Empty,
            Entity::Text(_) => EntityKind::Text,
            Entity::Json(_) => EntityKind::Json,
            Entity::Bytes(_) => EntityKind::Bytes,
            Entity::File(_) => EntityKind::File,
            Entity::Streaming(_) => EntityKind::Streaming,
            Entity::Reader(_) => EntityKind::Reader,
            Entity::DataSource(_) => EntityKind::DataSource,
        }
    }

    /// Drains the entity into bytes. Files and streams are read here.
    pub(crate) fn materialize(self) -> io::Result<Vec<u8>> {
        match self {
            Entity::Empty => Ok(Vec::new()),
            Entity::Text(text) => Ok(text.into_bytes()),
            Entity::Json(value) => serde_json::to_vec(&value).map_err(io::Error::from),
            Entity::Bytes(bytes) => Ok(bytes),
            Entity::File(path) => fs::read(path),
            Entity::Streaming(writer) => {
                let mut buffer = Vec::new();
                writer(&mut buffer)?;
                Ok(buffer)
            }
            Entity::Reader(mut reader) => {
                let mut buffer = Vec::new();
                reader.read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Entity::DataSource(mut source) => source.read_all(),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Entity::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Entity::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
            Entity::File(path) => f.debug_tuple("File").field(path).finish(),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

impl From<String> for Entity {
    fn from(value: String) -> Self {
        Entity::Text(value)
    }
}

impl From<&str> for Entity {
    fn from(value: &str) -> Self {
        Entity::Text(value.to_owned())
    }
}

impl From<Vec<u8>> for Entity {
    fn from(value: Vec<u8>) -> Self {
        Entity::Bytes(value)
    }
}

impl From<serde_json::Value> for Entity {
    fn from(value: serde_json::Value) -> Self {
        Entity::Json(value)
    }
}

/// What a committed body was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    #[default]
    Empty,
    /// Bytes written straight into the capture buffer. Whether they are
    /// binary depends on the response, see [`crate::BinaryPolicy::classify`].
    Buffer,
    Text,
    Json,
    Bytes,
    File,
    Streaming,
    Reader,
    DataSource,
}

impl EntityKind {
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            EntityKind::Bytes
                | EntityKind::File
                | EntityKind::Streaming
                | EntityKind::Reader
                | EntityKind::DataSource
        )
    }
}

/// Immutable response value produced by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub kind: EntityKind,
}

impl CapturedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            kind: EntityKind::Empty,
        }
    }

    /// Fixed reply used whenever the invocation cannot produce its own.
    pub fn internal_server_error() -> Self {
        Self::new(status::INTERNAL_SERVER_ERROR)
    }

    pub fn forbidden() -> Self {
        Self::new(status::FORBIDDEN)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>, kind: EntityKind) -> Self {
        self.body = body.into();
        self.kind = kind;
        self
    }

    /// Explicit reason phrase, or the registered one for the status code.
    pub fn reason_phrase(&self) -> Option<&str> {
        self.reason.as_deref().or_else(|| {
            http::StatusCode::from_u16(self.status)
                .ok()
                .and_then(|code| code.canonical_reason())
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

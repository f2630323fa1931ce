use crate::controller::LifecycleState;
use std::io;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Illegal lifecycle transitions and engine lifecycle hook failures.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("cannot {action} a controller that is {from:?}")]
    IllegalTransition {
        from: LifecycleState,
        action: &'static str,
    },
    #[error("embedded engine failed to start")]
    Startup(#[source] EngineError),
    #[error("embedded engine failed to shut down")]
    Shutdown(#[source] EngineError),
}

/// A platform event could not be turned into a canonical request.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("platform event is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{0}` is not a valid request method")]
    InvalidMethod(String),
    #[error("`{uri}` is not a valid request uri")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request body is not valid base64")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("platform event payload is malformed")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Failure raised by the embedded HTTP engine.
#[derive(Debug, Error)]
#[error("embedded engine failed: {source}")]
pub struct EngineError {
    #[source]
    source: BoxError,
}

impl EngineError {
    pub fn new<E: Into<BoxError>>(source: E) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn into_inner(self) -> BoxError {
        self.source
    }
}

impl From<CaptureError> for EngineError {
    fn from(error: CaptureError) -> Self {
        Self::new(error)
    }
}

/// Misuse of a [`crate::ResponseCapture`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("response has already been committed")]
    Closed,
    #[error("{0} is not supported for serverless responses")]
    Unsupported(&'static str),
}

/// I/O failure while writing out a committed response. Fatal for the invocation.
#[derive(Debug, Error)]
#[error("failed to commit response")]
pub struct ResponseCommitError {
    #[from]
    source: io::Error,
}

impl ResponseCommitError {
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}

/// Everything that routes an invocation through the failure hook.
#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("before-handle hook failed")]
    BeforeHandle(#[source] BoxError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

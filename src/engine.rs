use crate::capture::ResponseCapture;
use crate::error::EngineError;
use crate::request::CanonicalRequest;
use http::Extensions;
use indexmap::IndexMap;

/// Authenticated caller resolved by the platform translator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Principal {
    pub name: String,
    pub claims: IndexMap<String, String>,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            claims: IndexMap::new(),
        }
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    pub fn claim(&self, key: &str) -> Option<&str> {
        self.claims.get(key).map(String::as_str)
    }
}

/// Embedded HTTP processing engine the controller delegates to.
///
/// `handle` writes the response into `capture`; the controller commits it
/// afterwards. `enrich` lets the engine pull platform values (the raw event,
/// request context) into its own per-request extension map.
pub trait HttpEngine: Send + Sync {
    fn handle(
        &self,
        request: &CanonicalRequest,
        capture: &ResponseCapture,
        principal: Option<&Principal>,
        enrich: &dyn Fn(&mut Extensions),
    ) -> Result<(), EngineError>;

    fn on_startup(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn on_shutdown(&self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Everything an [`FnEngine`] handler sees for one request.
pub struct RequestScope<'a> {
    pub request: &'a CanonicalRequest,
    pub principal: Option<&'a Principal>,
    pub extensions: Extensions,
}

/// Engine backed by a plain handler function.
pub struct FnEngine<F> {
    handler: F,
}

pub fn engine_fn<F>(handler: F) -> FnEngine<F>
where
    F: Fn(&RequestScope<'_>, &ResponseCapture) -> Result<(), EngineError> + Send + Sync,
{
    FnEngine { handler }
}

impl<F> HttpEngine for FnEngine<F>
where
    F: Fn(&RequestScope<'_>, &ResponseCapture) -> Result<(), EngineError> + Send + Sync,
{
    fn handle(
        &self,
        request: &CanonicalRequest,
        capture: &ResponseCapture,
        principal: Option<&Principal>,
        enrich: &dyn Fn(&mut Extensions),
    ) -> Result<(), EngineError> {
        let mut extensions = request.context().clone();
        enrich(&mut extensions);
        let scope = RequestScope {
            request,
            principal,
            extensions,
        };
        (self.handler)(&scope, capture)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

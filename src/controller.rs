use crate::binary::BinaryPolicy;
use crate::capture::{DiscardSink, ResponseCapture, ResponseSink};
use crate::cors::CorsValidator;
use crate::engine::HttpEngine;
use crate::error::{DelegateError, EngineError, LifecycleError, ResponseCommitError};
use crate::hooks::{DefaultHooks, LifecycleHooks};
use crate::request::CanonicalRequest;
use crate::response::CapturedResponse;
use crate::result::CorsOutcome;
use crate::transcoding::TranscodingPipeline;
use crate::translator::{PlatformResult, PlatformTranslator, ReplyFlags};
use http::Extensions;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Externally visible lifecycle of a controller. Never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Started,
    Stopped,
}

const UNINITIALIZED: u8 = 0;
const INITIALIZED: u8 = 1;
const STARTING: u8 = 2;
const STARTED: u8 = 3;
const STOPPING: u8 = 4;
const STOPPED: u8 = 5;

fn decode(state: u8) -> LifecycleState {
    match state {
        UNINITIALIZED => LifecycleState::Uninitialized,
        INITIALIZED | STARTING => LifecycleState::Initialized,
        STARTED | STOPPING => LifecycleState::Started,
        _ => LifecycleState::Stopped,
    }
}

enum Prepared {
    Synthetic(CapturedResponse, CorsOutcome),
    Dispatch(CanonicalRequest, CorsOutcome),
}

/// Drives one platform translator and one embedded engine through the
/// init/start/stop lifecycle and delegates every invocation to the engine.
///
/// The controller is `Send + Sync`; `delegate` may run concurrently on any
/// number of threads once the controller has been started.
pub struct RequestLifecycleController<T, E, H = DefaultHooks> {
    translator: T,
    hooks: H,
    cors: Option<CorsValidator>,
    binary_policy: BinaryPolicy,
    pipeline: TranscodingPipeline,
    sink: Arc<dyn ResponseSink>,
    engine: OnceCell<E>,
    state: AtomicU8,
}

impl<T, E, H> RequestLifecycleController<T, E, H>
where
    T: PlatformTranslator,
    E: HttpEngine,
    H: LifecycleHooks<T::Event>,
{
    pub fn state(&self) -> LifecycleState {
        decode(self.state.load(Ordering::Acquire))
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.get()
    }

    pub fn cors(&self) -> Option<&CorsValidator> {
        self.cors.as_ref()
    }

    pub fn init(&self, engine: E) -> Result<(), LifecycleError> {
        self.init_with(engine, |_| {})
    }

    /// Stores the engine after letting `customize` configure it.
    pub fn init_with<F>(&self, mut engine: E, customize: F) -> Result<(), LifecycleError>
    where
        F: FnOnce(&mut E),
    {
        let current = self.state.load(Ordering::Acquire);
        if current != UNINITIALIZED {
            return Err(LifecycleError::IllegalTransition {
                from: decode(current),
                action: "initialize",
            });
        }

        customize(&mut engine);
        if self.engine.set(engine).is_err() {
            return Err(LifecycleError::IllegalTransition {
                from: LifecycleState::Initialized,
                action: "initialize",
            });
        }

        self.state.store(INITIALIZED, Ordering::Release);
        tracing::debug!("controller initialized");
        Ok(())
    }

    pub fn start(&self) -> Result<(), LifecycleError> {
        self.transition(INITIALIZED, STARTING, "start")?;
        let result = self.engine.get().map_or(Ok(()), |engine| engine.on_startup());

        match result {
            Ok(()) => {
                self.state.store(STARTED, Ordering::Release);
                tracing::debug!("controller started");
                Ok(())
            }
            Err(error) => {
                self.state.store(INITIALIZED, Ordering::Release);
                tracing::error!(%error, "engine startup failed");
                Err(LifecycleError::Startup(error))
            }
        }
    }

    /// Moves to `Stopped` even when the engine fails to shut down cleanly.
    pub fn stop(&self) -> Result<(), LifecycleError> {
        self.transition(STARTED, STOPPING, "stop")?;
        let result = self.engine.get().map_or(Ok(()), |engine| engine.on_shutdown());
        self.state.store(STOPPED, Ordering::Release);
        tracing::debug!("controller stopped");

        result.map_err(|error: EngineError| {
            tracing::error!(%error, "engine shutdown failed");
            LifecycleError::Shutdown(error)
        })
    }

    fn transition(&self, from: u8, to: u8, action: &'static str) -> Result<(), LifecycleError> {
        self.state
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|current| LifecycleError::IllegalTransition {
                from: decode(current),
                action,
            })
    }

    /// Handles one platform invocation end to end.
    ///
    /// Only a failure to write out the committed response is returned as an
    /// error; every other failure becomes a reply.
    pub fn delegate(
        &self,
        event: &T::Event,
    ) -> Result<PlatformResult<T::Reply>, ResponseCommitError> {
        let engine = match (self.state.load(Ordering::Acquire), self.engine.get()) {
            (STARTED, Some(engine)) => engine,
            (state, _) => {
                tracing::error!(
                    state = ?decode(state),
                    "invocation received by a controller that is not started"
                );
                return Ok(self.translator.to_platform_reply(
                    &CapturedResponse::internal_server_error(),
                    &ReplyFlags::default(),
                ));
            }
        };

        let (response, outcome) = match self.prepare(event) {
            Ok(Prepared::Synthetic(response, outcome)) => (response, outcome),
            Ok(Prepared::Dispatch(request, outcome)) => {
                let capture = ResponseCapture::new(Arc::clone(&self.sink));
                let response = match self.invoke(engine, event, &request, &capture) {
                    Ok(()) => {
                        capture.commit()?;
                        self.complete(capture.into_committed(), event)
                    }
                    Err(error) => self.recover(&error, event),
                };
                (response, outcome)
            }
            Err(error) => (self.recover(&error, event), CorsOutcome::NotCors),
        };

        self.finalize(response, &outcome)
    }

    fn prepare(&self, event: &T::Event) -> Result<Prepared, DelegateError> {
        self.hooks
            .before_handle(event)
            .map_err(DelegateError::BeforeHandle)?;
        let request = self.translator.to_canonical_request(event)?;

        let Some(cors) = &self.cors else {
            return Ok(Prepared::Dispatch(request, CorsOutcome::NotCors));
        };

        let outcome = cors.filter_request(&request);
        match CorsValidator::short_circuit(&outcome) {
            Some(response) => Ok(Prepared::Synthetic(response, outcome)),
            None => Ok(Prepared::Dispatch(request, outcome)),
        }
    }

    fn invoke(
        &self,
        engine: &E,
        event: &T::Event,
        request: &CanonicalRequest,
        capture: &ResponseCapture,
    ) -> Result<(), DelegateError> {
        let principal = self.translator.principal(event);
        engine.handle(
            request,
            capture,
            principal.as_ref(),
            &|extensions: &mut Extensions| self.translator.enrich(event, extensions),
        )?;
        Ok(())
    }

    fn complete(&self, committed: Option<CapturedResponse>, event: &T::Event) -> CapturedResponse {
        let Some(response) = committed else {
            tracing::error!("engine produced no committed response");
            return CapturedResponse::internal_server_error();
        };

        self.hooks.on_success(response, event).unwrap_or_else(|| {
            tracing::debug!("success hook discarded the response");
            CapturedResponse::internal_server_error()
        })
    }

    fn recover(&self, error: &DelegateError, event: &T::Event) -> CapturedResponse {
        tracing::error!(%error, "invocation failed");
        match self.hooks.on_failure(error, event) {
            Ok(response) => response,
            Err(hook_error) => {
                tracing::error!(error = %hook_error, "failure hook failed, replying with 500");
                CapturedResponse::internal_server_error()
            }
        }
    }

    fn finalize(
        &self,
        mut response: CapturedResponse,
        outcome: &CorsOutcome,
    ) -> Result<PlatformResult<T::Reply>, ResponseCommitError> {
        if let Some(cors) = &self.cors {
            cors.filter_response(outcome, &mut response.headers);
        }

        let decision = self.binary_policy.apply(&mut response);
        self.pipeline.process(&mut response, decision)?;

        let flags = ReplyFlags {
            platform_binary: decision.platform_binary,
            cors_failed: outcome.is_cors_failed(),
        };
        Ok(self.translator.to_platform_reply(&response, &flags))
    }
}

/// Assembles a [`RequestLifecycleController`]. Only the translator is required.
pub struct ControllerBuilder<T, H = DefaultHooks> {
    translator: T,
    hooks: H,
    cors: Option<CorsValidator>,
    binary_policy: BinaryPolicy,
    pipeline: TranscodingPipeline,
    sink: Arc<dyn ResponseSink>,
}

impl<T> ControllerBuilder<T> {
    pub fn new(translator: T) -> Self {
        Self {
            translator,
            hooks: DefaultHooks,
            cors: None,
            binary_policy: BinaryPolicy::default(),
            pipeline: TranscodingPipeline::default(),
            sink: Arc::new(DiscardSink),
        }
    }
}

impl<T, H> ControllerBuilder<T, H> {
    /// Enables CORS handling. Without a validator every request is dispatched untouched.
    pub fn cors(mut self, validator: CorsValidator) -> Self {
        self.cors = Some(validator);
        self
    }

    pub fn binary_policy(mut self, policy: BinaryPolicy) -> Self {
        self.binary_policy = policy;
        self
    }

    pub fn pipeline(mut self, pipeline: TranscodingPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: ResponseSink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    pub fn hooks<N>(self, hooks: N) -> ControllerBuilder<T, N> {
        ControllerBuilder {
            translator: self.translator,
            hooks,
            cors: self.cors,
            binary_policy: self.binary_policy,
            pipeline: self.pipeline,
            sink: self.sink,
        }
    }

    pub fn build<E>(self) -> RequestLifecycleController<T, E, H> {
        RequestLifecycleController {
            translator: self.translator,
            hooks: self.hooks,
            cors: self.cors,
            binary_policy: self.binary_policy,
            pipeline: self.pipeline,
            sink: self.sink,
            engine: OnceCell::new(),
            state: AtomicU8::new(UNINITIALIZED),
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::error::{BoxError, DelegateError};
use crate::response::CapturedResponse;
use std::sync::Arc;

/// Extension points around every delegated invocation.
///
/// None of the hooks run before the controller has been started.
pub trait LifecycleHooks<E>: Send + Sync {
    /// Runs before translation. An error routes the invocation to [`Self::on_failure`].
    fn before_handle(&self, _event: &E) -> Result<(), BoxError> {
        Ok(())
    }

    /// Sees every successfully dispatched response. `None` replaces it with a 500.
    fn on_success(&self, response: CapturedResponse, _event: &E) -> Option<CapturedResponse> {
        Some(response)
    }

    /// Builds the reply for a failed invocation. An error here is swallowed
    /// and the fixed 500 response is used instead.
    fn on_failure(&self, _error: &DelegateError, _event: &E) -> Result<CapturedResponse, BoxError> {
        Ok(CapturedResponse::internal_server_error())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl<E> LifecycleHooks<E> for DefaultHooks {}

impl<E, H> LifecycleHooks<E> for Arc<H>
where
    H: LifecycleHooks<E> + ?Sized,
{
    fn before_handle(&self, event: &E) -> Result<(), BoxError> {
        (**self).before_handle(event)
    }

    fn on_success(&self, response: CapturedResponse, event: &E) -> Option<CapturedResponse> {
        (**self).on_success(response, event)
    }

    fn on_failure(&self, error: &DelegateError, event: &E) -> Result<CapturedResponse, BoxError> {
        (**self).on_failure(error, event)
    }
}

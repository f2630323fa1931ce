use crate::error::{CaptureError, ResponseCommitError};
use crate::headers::HeaderMap;
use crate::response::{CapturedResponse, Entity, EntityKind};
use once_cell::sync::OnceCell;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Destination a committed response is written to exactly once.
pub trait ResponseSink: Send + Sync {
    fn write_response(&self, response: &CapturedResponse) -> io::Result<()>;
}

impl<S> ResponseSink for Arc<S>
where
    S: ResponseSink + ?Sized,
{
    fn write_response(&self, response: &CapturedResponse) -> io::Result<()> {
        (**self).write_response(response)
    }
}

/// Sink that keeps nothing; the committed value stays on the capture.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl ResponseSink for DiscardSink {
    fn write_response(&self, _response: &CapturedResponse) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct PendingResponse {
    status: u16,
    reason: Option<String>,
    headers: HeaderMap,
    buffer: Vec<u8>,
    entity: Option<Entity>,
}

impl Default for PendingResponse {
    fn default() -> Self {
        Self {
            status: 200,
            reason: None,
            headers: HeaderMap::new(),
            buffer: Vec::new(),
            entity: None,
        }
    }
}

impl PendingResponse {
    fn into_response(self) -> io::Result<CapturedResponse> {
        let PendingResponse {
            status,
            reason,
            headers,
            mut buffer,
            entity,
        } = self;

        let kind = match entity {
            Some(entity) => {
                let kind = entity.kind();
                buffer.extend(entity.materialize()?);
                kind
            }
            None if buffer.is_empty() => EntityKind::Empty,
            None => EntityKind::Buffer,
        };

        Ok(CapturedResponse {
            status,
            reason,
            headers,
            body: buffer,
            kind,
        })
    }
}

/// Per-invocation response the engine writes into.
///
/// Every setter takes `&self` so success and failure paths can share one
/// capture; [`ResponseCapture::commit`] guarantees a single write-out.
pub struct ResponseCapture {
    pending: Mutex<PendingResponse>,
    closed: AtomicBool,
    committed: OnceCell<CapturedResponse>,
    sink: Arc<dyn ResponseSink>,
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new(Arc::new(DiscardSink))
    }
}

impl ResponseCapture {
    pub fn new(sink: Arc<dyn ResponseSink>) -> Self {
        Self {
            pending: Mutex::new(PendingResponse::default()),
            closed: AtomicBool::new(false),
            committed: OnceCell::new(),
            sink,
        }
    }

    fn open(&self) -> Result<MutexGuard<'_, PendingResponse>, CaptureError> {
        let guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if self.closed.load(Ordering::Acquire) {
            return Err(CaptureError::Closed);
        }
        Ok(guard)
    }

    pub fn set_status(&self, status: u16) -> Result<(), CaptureError> {
        self.open()?.status = status;
        Ok(())
    }

    pub fn set_reason(&self, reason: impl Into<String>) -> Result<(), CaptureError> {
        self.open()?.reason = Some(reason.into());
        Ok(())
    }

    pub fn add_header(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), CaptureError> {
        self.open()?.headers.append(name, value);
        Ok(())
    }

    pub fn set_header(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), CaptureError> {
        self.open()?.headers.insert(name, value);
        Ok(())
    }

    pub fn remove_header(&self, name: &str) -> Result<(), CaptureError> {
        self.open()?.headers.remove(name);
        Ok(())
    }

    /// Appends raw bytes to the body buffer.
    pub fn write_body(&self, bytes: &[u8]) -> Result<(), CaptureError> {
        self.open()?.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Sets the entity materialized at commit, after any buffered bytes.
    pub fn set_entity(&self, entity: impl Into<Entity>) -> Result<(), CaptureError> {
        self.open()?.entity = Some(entity.into());
        Ok(())
    }

    pub fn status(&self) -> u16 {
        match self.committed.get() {
            Some(response) => response.status,
            None => {
                self.pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .status
            }
        }
    }

    pub fn is_committed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes the capture and writes it out. Returns `Ok(false)` when another
    /// caller already committed.
    pub fn commit(&self) -> Result<bool, ResponseCommitError> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("response already committed, ignoring repeated commit");
            return Ok(false);
        }

        let pending = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let response = pending.into_response()?;
        self.sink.write_response(&response)?;
        let _ = self.committed.set(response);
        Ok(true)
    }

    pub fn committed(&self) -> Option<&CapturedResponse> {
        self.committed.get()
    }

    pub fn into_committed(self) -> Option<CapturedResponse> {
        self.committed.into_inner()
    }

    /// Asynchronous responses cannot be expressed on a serverless platform.
    pub fn suspend(&self, _timeout: Option<Duration>) -> Result<(), CaptureError> {
        tracing::error!("attempted to suspend a serverless response");
        Err(CaptureError::Unsupported("response suspension"))
    }

    pub fn set_suspend_timeout(&self, _timeout: Duration) -> Result<(), CaptureError> {
        tracing::error!("attempted to configure a response timeout");
        Err(CaptureError::Unsupported("response timeout"))
    }
}

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

//! The reporting backend seen from the dispatcher.

use std::sync::Arc;

use crate::error::ReportError;

/// Event parameters, in insertion order.
pub type EventParams = serde_json::Map<String, serde_json::Value>;

/// Third-party reporting backend.
///
/// Called without any dispatcher lock held; an implementation may record
/// further events through the same [`Dispatcher`](crate::Dispatcher).
pub trait Reporter: Send + Sync {
    /// Sends one enriched event.
    fn report(&self, name: &str, params: &EventParams) -> Result<(), ReportError>;
}

impl<R> Reporter for Arc<R>
where
    R: Reporter + ?Sized,
{
    fn report(&self, name: &str, params: &EventParams) -> Result<(), ReportError> {
        self.as_ref().report(name, params)
    }
}

/// Existence check used by [`Dispatcher::poll_for_backend`](crate::Dispatcher::poll_for_backend).
pub trait BackendProbe: Send + Sync {
    /// Returns the reporter once the backend is loaded.
    fn detect(&self) -> Option<Arc<dyn Reporter>>;
}

impl<F> BackendProbe for F
where
    F: Fn() -> Option<Arc<dyn Reporter>> + Send + Sync,
{
    fn detect(&self) -> Option<Arc<dyn Reporter>> {
        self()
    }
}

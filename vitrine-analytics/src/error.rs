//! Errors returned by reporters.

use thiserror::Error;

/// Failure returned by a [`Reporter`](crate::Reporter).
///
/// Reporter failures are never retried or swallowed; they reach the caller of
/// [`Dispatcher::record`](crate::Dispatcher::record) or
/// [`Dispatcher::attach`](crate::Dispatcher::attach).
#[derive(Debug, Error)]
pub enum ReportError {
    /// The reporting backend rejected the event.
    #[error("reporter failed: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl ReportError {
    /// Wraps any error as a backend failure.
    pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(error.into())
    }
}

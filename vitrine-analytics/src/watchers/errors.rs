use serde_json::json;

use crate::dispatcher::Dispatcher;
use crate::error::ReportError;

/// An uncaught script error as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptError {
    /// Error message.
    pub message: String,
    /// Script URL.
    pub filename: String,
    /// Line number.
    pub lineno: u32,
    /// Column number.
    pub colno: u32,
}

/// Forwards uncaught errors and unhandled rejections as `javascript_error`.
///
/// The watcher only observes; the host keeps its own error reporting.
#[derive(Debug, Clone)]
pub struct ErrorWatcher {
    dispatcher: Dispatcher,
}

impl ErrorWatcher {
    /// Creates a watcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handles an uncaught error.
    pub fn on_error(&self, error: &ScriptError) -> Result<(), ReportError> {
        self.dispatcher.track_error(
            "javascript_error",
            &error.message,
            json!({
                "filename": error.filename,
                "lineno": error.lineno,
                "colno": error.colno,
            }),
        )
    }

    /// Handles an unhandled promise rejection.
    pub fn on_unhandled_rejection(&self, reason: &str) -> Result<(), ReportError> {
        self.dispatcher.track_error(
            "promise_rejection",
            reason,
            json!({ "type": "unhandled_promise_rejection" }),
        )
    }
}

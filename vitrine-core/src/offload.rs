//! Offload trait for background task execution.
//!
//! Stale-while-revalidate answers from the cache and refreshes the entry
//! afterwards. The refresh is handed to an [`Offload`] implementation so the
//! strategy code does not depend on a particular executor.

use std::future::Future;

use smol_str::SmolStr;

/// Trait for spawning background tasks.
///
/// # Clone bound
///
/// Implementors should use `Arc` internally so that every clone shares the
/// same task registry.
pub trait Offload: Send + Sync + Clone {
    /// Spawn `future` in the background.
    ///
    /// * `key` - identifies the task; implementations may skip a task whose
    ///   key is already in flight.
    /// * `future` - the work to run.
    fn spawn<F>(&self, key: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Offload that drops every task.
///
/// Stale-while-revalidate degrades to "serve stale, never refresh".
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOffload;

impl Offload for DisabledOffload {
    fn spawn<F>(&self, _key: impl Into<SmolStr>, _future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
    }
}

//! OffloadManager implementation for background revalidation.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use smol_str::SmolStr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span, warn};
use vitrine_core::Offload;

use super::policy::{OffloadConfig, TimeoutPolicy};

#[cfg(feature = "metrics")]
use crate::metrics::{OFFLOAD_TASKS_DEDUPLICATED, OFFLOAD_TASKS_SPAWNED};

#[derive(Debug)]
struct Tracked {
    id: u64,
    handle: JoinHandle<()>,
}

/// Internal state shared across clones.
#[derive(Debug)]
struct OffloadManagerInner {
    config: OffloadConfig,
    tasks: DashMap<SmolStr, Tracked>,
    next_id: AtomicU64,
}

/// Manager for background tasks, keyed by request URL.
///
/// Two revalidations of the same URL never run at once when deduplication
/// is enabled (the default). A task stops being tracked as soon as it
/// completes.
#[derive(Clone, Debug)]
pub struct OffloadManager {
    inner: Arc<OffloadManagerInner>,
}

impl OffloadManager {
    /// Create a new OffloadManager with the given configuration.
    pub fn new(config: OffloadConfig) -> Self {
        Self {
            inner: Arc::new(OffloadManagerInner {
                config,
                tasks: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Create a new OffloadManager with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(OffloadConfig::default())
    }

    /// Spawn a task under `key`.
    ///
    /// Returns `false` if deduplication skipped it.
    pub fn spawn_with_key<F>(&self, key: impl Into<SmolStr>, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();

        if self.inner.config.deduplicate && self.is_in_flight(&key) {
            debug!(%key, "Task deduplicated - already in flight");
            #[cfg(feature = "metrics")]
            metrics::counter!(*OFFLOAD_TASKS_DEDUPLICATED).increment(1);
            return false;
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (registered, wait_registered) = oneshot::channel();
        let handle = self.spawn_inner(key.clone(), id, wait_registered, task);
        self.inner.tasks.insert(key, Tracked { id, handle });
        // The task untracks itself only after this point.
        let _ = registered.send(());

        #[cfg(feature = "metrics")]
        metrics::counter!(*OFFLOAD_TASKS_SPAWNED).increment(1);

        true
    }

    /// Get the number of currently active tasks.
    pub fn active_task_count(&self) -> usize {
        self.inner
            .tasks
            .iter()
            .filter(|e| !e.handle.is_finished())
            .count()
    }

    /// Number of tracked task handles, finished or not.
    pub fn tracked_task_count(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&self) {
        for entry in self.inner.tasks.iter() {
            entry.handle.abort();
        }
        self.inner.tasks.clear();
    }

    /// Check if a task with the given key is in flight.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.inner
            .tasks
            .get(key)
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Wait for all currently tracked tasks to complete.
    pub async fn wait_all(&self) {
        loop {
            self.inner.tasks.retain(|_, t| !t.handle.is_finished());
            if self.inner.tasks.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
    }

    fn spawn_inner<F>(
        &self,
        key: SmolStr,
        id: u64,
        registered: oneshot::Receiver<()>,
        task: F,
    ) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let span = info_span!("revalidate", key = %key);
        let inner = Arc::clone(&self.inner);
        let policy = self.inner.config.timeout_policy;

        tokio::spawn(
            async move {
                match policy {
                    TimeoutPolicy::None => task.await,
                    TimeoutPolicy::Cancel(budget) => {
                        if tokio::time::timeout(budget, task).await.is_err() {
                            warn!(%key, "Offload task cancelled due to timeout");
                        }
                    }
                    TimeoutPolicy::Warn(budget) => {
                        let start = Instant::now();
                        task.await;
                        let elapsed = start.elapsed();
                        if elapsed > budget {
                            warn!(
                                %key,
                                elapsed_ms = elapsed.as_millis(),
                                threshold_ms = budget.as_millis(),
                                "Offload task exceeded timeout threshold"
                            );
                        }
                    }
                }
                let _ = registered.await;
                inner.tasks.remove_if(&key, |_, tracked| tracked.id == id);
            }
            .instrument(span),
        )
    }
}

impl Default for OffloadManager {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Offload for OffloadManager {
    fn spawn<F>(&self, key: impl Into<SmolStr>, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawn_with_key(key, future);
    }
}

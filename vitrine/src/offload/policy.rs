//! Limits applied to background revalidations.

use std::time::Duration;

/// What happens to a revalidation that outlives its budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeoutPolicy {
    /// Runs until the network answers.
    #[default]
    None,
    /// Aborted after the duration; the cached copy is left as it was.
    Cancel(Duration),
    /// Runs to completion, with a warning when it took longer than the duration.
    Warn(Duration),
}

/// Configuration for [`OffloadManager`](super::OffloadManager).
///
/// ```
/// use std::time::Duration;
/// use vitrine::offload::{OffloadConfig, TimeoutPolicy};
///
/// let config = OffloadConfig::default().cancel_after(Duration::from_secs(10));
/// assert_eq!(config.timeout_policy, TimeoutPolicy::Cancel(Duration::from_secs(10)));
/// assert!(config.deduplicate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffloadConfig {
    /// Applied to every spawned revalidation.
    pub timeout_policy: TimeoutPolicy,
    /// Skip a revalidation whose URL is already being refreshed.
    pub deduplicate: bool,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            timeout_policy: TimeoutPolicy::None,
            deduplicate: true,
        }
    }
}

impl OffloadConfig {
    /// Abort revalidations that run longer than `budget`.
    pub fn cancel_after(self, budget: Duration) -> Self {
        Self {
            timeout_policy: TimeoutPolicy::Cancel(budget),
            ..self
        }
    }

    /// Log revalidations that run longer than `budget`.
    pub fn warn_after(self, budget: Duration) -> Self {
        Self {
            timeout_policy: TimeoutPolicy::Warn(budget),
            ..self
        }
    }

    /// Enable or disable per-URL deduplication.
    pub fn deduplicate(self, enabled: bool) -> Self {
        Self {
            deduplicate: enabled,
            ..self
        }
    }
}

//! Partition label type for identifying cache partitions.
//!
//! `PartitionLabel` is a newtype wrapper around `SmolStr` naming one isolated
//! cache store, e.g. `businesspro-static-v1.0.0` or `fonts-cache`.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// A label identifying a cache partition.
///
/// Used for:
/// - Looking up partitions in the cache storage registry
/// - Routing: every route names the partition it reads and writes
/// - Metrics and tracing fields
///
/// # Example
/// ```
/// use vitrine_core::PartitionLabel;
///
/// let label = PartitionLabel::versioned("businesspro-static", "v1.0.0");
/// assert_eq!(label.as_str(), "businesspro-static-v1.0.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionLabel(SmolStr);

impl PartitionLabel {
    /// Creates a new partition label.
    #[inline]
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Creates a partition label from a static string (no allocation).
    #[inline]
    pub const fn new_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    /// Builds a label of the form `"{name}-{version}"`.
    ///
    /// Bumping the version produces a fresh partition, and the old one is
    /// removed on the next activation.
    pub fn versioned(name: &str, version: &str) -> Self {
        Self(SmolStr::from(format!("{name}-{version}")))
    }

    /// Returns the label as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PartitionLabel {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for PartitionLabel {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

impl AsRef<str> for PartitionLabel {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

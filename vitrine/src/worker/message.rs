use serde::{Deserialize, Serialize};

/// Control messages posted to the worker by pages.
///
/// Messages use a `type` tag, e.g. `{"type": "GET_CACHE_SIZE"}`. Unknown
/// types deserialize to [`WorkerMessage::Unknown`] and are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate the new worker without waiting for old pages to close.
    SkipWaiting,
    /// Purge expired entries from every partition.
    CleanupCaches,
    /// Ask for the total size of stored bodies.
    GetCacheSize,
    /// Anything else.
    #[serde(other)]
    Unknown,
}

/// Reply sent back on the message port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageReply {
    /// Answer to [`WorkerMessage::GetCacheSize`].
    CacheSize {
        /// Total bytes across all partitions.
        size: u64,
    },
}

use std::time::Duration;

/// Size and age limits applied when writing to a partition.
///
/// The age limit is stamped on the written entry. The entry cap applies to
/// the partition only when the partition has no cap of its own, see
/// [`CacheStorage::set_capacity`](crate::CacheStorage::set_capacity). A write
/// without an entry cap is pinned: it is neither counted nor evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Expiration {
    /// Maximum number of capped entries kept in the partition after the write.
    pub max_entries: Option<usize>,
    /// Maximum age of the written entry.
    pub max_age: Option<Duration>,
}

impl Expiration {
    /// No limits at all. Used for precached assets.
    pub const UNBOUNDED: Expiration = Expiration {
        max_entries: None,
        max_age: None,
    };

    /// Limits expressed the way route tables declare them.
    pub const fn new(max_entries: usize, max_age_seconds: u64) -> Self {
        Self {
            max_entries: Some(max_entries),
            max_age: Some(Duration::from_secs(max_age_seconds)),
        }
    }

    /// Maximum age in whole seconds, if bounded.
    pub fn max_age_seconds(&self) -> Option<u64> {
        self.max_age.map(|age| age.as_secs())
    }
}

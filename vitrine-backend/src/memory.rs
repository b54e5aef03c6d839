//! In-memory partition implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::trace;
use vitrine_core::{CacheState, CacheValue, FetchResponse, PartitionLabel};

use crate::{Backend, BackendResult, DeleteStatus, Expiration};

#[derive(Debug)]
struct Entry {
    value: CacheValue<FetchResponse>,
    // Written without an entry cap; never counted or evicted.
    pinned: bool,
}

#[derive(Debug, Default)]
struct Slots {
    entries: IndexMap<String, Entry>,
    capacity: Option<usize>,
}

impl Slots {
    fn evict_beyond(&mut self, limit: usize, label: &PartitionLabel) {
        let mut counted = self.entries.values().filter(|entry| !entry.pinned).count();
        while counted > limit {
            let Some(index) = self.entries.values().position(|entry| !entry.pinned) else {
                break;
            };
            if let Some((evicted, _)) = self.entries.shift_remove_index(index) {
                trace!(partition = %label, key = %evicted, "evicted oldest entry");
            }
            counted -= 1;
        }
    }
}

/// In-memory partition with FIFO eviction.
///
/// Entries are kept in insertion order. Writing an existing key moves it to
/// the back, so "oldest" always means "least recently written".
///
/// The entry cap belongs to the partition when one is set with
/// [`set_capacity`](MemoryPartition::set_capacity); otherwise the cap of
/// each write applies. Entries written with [`Expiration::UNBOUNDED`] limits
/// (precached assets) do not count towards the cap and are never evicted.
///
/// # Examples
///
/// ```
/// use vitrine_backend::{Backend, MemoryPartition};
///
/// let partition = MemoryPartition::new("static-v1");
/// assert!(partition.is_empty());
/// assert_eq!(partition.label().as_str(), "static-v1");
/// ```
///
/// # Caveats
///
/// - Data is **not persisted** and not shared across processes.
/// - Expired entries stay in memory until they are read or purged.
#[derive(Debug)]
pub struct MemoryPartition {
    label: PartitionLabel,
    slots: Mutex<Slots>,
}

impl MemoryPartition {
    /// Creates an empty partition.
    pub fn new(label: impl Into<PartitionLabel>) -> Self {
        Self {
            label: label.into(),
            slots: Mutex::new(Slots::default()),
        }
    }

    /// Creates an empty partition holding at most `max_entries` capped entries.
    pub fn with_capacity(label: impl Into<PartitionLabel>, max_entries: usize) -> Self {
        let partition = Self::new(label);
        partition.set_capacity(max_entries);
        partition
    }

    /// Sets the partition-wide entry cap and evicts down to it.
    pub fn set_capacity(&self, max_entries: usize) {
        let mut slots = self.lock();
        slots.capacity = Some(max_entries);
        slots.evict_beyond(max_entries, &self.label);
    }

    /// The partition-wide entry cap, if one was set.
    pub fn capacity(&self) -> Option<usize> {
        self.lock().capacity
    }

    /// Number of stored entries, expired and pinned ones included.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the partition holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Backend for MemoryPartition {
    async fn read(&self, key: &str) -> BackendResult<Option<FetchResponse>> {
        let mut slots = self.lock();
        let Some(entry) = slots.entries.get(key) else {
            return Ok(None);
        };
        match entry.value.clone().cache_state() {
            CacheState::Actual(value) => Ok(Some(value.into_inner())),
            CacheState::Expired(_) => {
                trace!(partition = %self.label, key, "dropping expired entry on lookup");
                slots.entries.shift_remove(key);
                Ok(None)
            }
        }
    }

    async fn write(
        &self,
        key: &str,
        value: FetchResponse,
        expiration: &Expiration,
    ) -> BackendResult<()> {
        let mut slots = self.lock();
        slots.entries.shift_remove(key);
        slots.entries.insert(
            key.to_owned(),
            Entry {
                value: CacheValue::fresh(value, expiration.max_age),
                pinned: expiration.max_entries.is_none(),
            },
        );

        if let Some(limit) = slots.capacity.or(expiration.max_entries) {
            slots.evict_beyond(limit, &self.label);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        Ok(match self.lock().entries.shift_remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    async fn keys(&self) -> BackendResult<Vec<String>> {
        Ok(self.lock().entries.keys().cloned().collect())
    }

    async fn purge_expired(&self) -> BackendResult<usize> {
        let mut slots = self.lock();
        let before = slots.entries.len();
        slots.entries.retain(|_, entry| !entry.value.is_expired());
        Ok(before - slots.entries.len())
    }

    async fn body_size(&self) -> BackendResult<u64> {
        Ok(self
            .lock()
            .entries
            .values()
            .map(|entry| entry.value.data().body().len() as u64)
            .sum())
    }

    fn label(&self) -> PartitionLabel {
        self.label.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn page(body: &'static str) -> FetchResponse {
        FetchResponse::ok(body)
    }

    #[tokio::test]
    async fn test_rewrite_moves_key_to_back() {
        let partition = MemoryPartition::new("p");
        let limits = Expiration::UNBOUNDED;
        partition.write("a", page("1"), &limits).await.unwrap();
        partition.write("b", page("2"), &limits).await.unwrap();
        partition.write("a", page("3"), &limits).await.unwrap();

        assert_eq!(partition.keys().await.unwrap(), vec!["b", "a"]);
        assert_eq!(partition.read("a").await.unwrap(), Some(page("3")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_counts_removed() {
        let partition = MemoryPartition::new("p");
        let short = Expiration {
            max_entries: None,
            max_age: Some(Duration::from_secs(5)),
        };
        partition.write("old", page("x"), &short).await.unwrap();
        partition
            .write("kept", page("y"), &Expiration::UNBOUNDED)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(partition.purge_expired().await.unwrap(), 1);
        assert_eq!(partition.keys().await.unwrap(), vec!["kept"]);
    }

    #[tokio::test]
    async fn test_pinned_entries_are_not_counted() {
        let partition = MemoryPartition::new("p");
        let capped = Expiration::new(1, 60);
        partition
            .write("pinned", page("p"), &Expiration::UNBOUNDED)
            .await
            .unwrap();
        partition.write("a", page("1"), &capped).await.unwrap();
        partition.write("b", page("2"), &capped).await.unwrap();

        assert_eq!(partition.keys().await.unwrap(), vec!["pinned", "b"]);
    }

    #[tokio::test]
    async fn test_partition_capacity_overrides_write_cap() {
        let partition = MemoryPartition::with_capacity("p", 3);
        let small = Expiration::new(1, 60);
        for key in ["a", "b", "c", "d"] {
            partition.write(key, page("x"), &small).await.unwrap();
        }

        assert_eq!(partition.keys().await.unwrap(), vec!["b", "c", "d"]);

        partition.set_capacity(2);
        assert_eq!(partition.keys().await.unwrap(), vec!["c", "d"]);
    }
}

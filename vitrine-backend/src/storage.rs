//! Registry of named partitions.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use vitrine_core::{FetchResponse, PartitionLabel};

use crate::{Backend, BackendResult, MemoryPartition};

/// Named partitions, opened lazily.
///
/// Cloning shares the same set of partitions.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    partitions: Arc<DashMap<PartitionLabel, Arc<MemoryPartition>>>,
    capacities: Arc<DashMap<PartitionLabel, usize>>,
}

impl CacheStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the entry cap of a partition.
    ///
    /// Applies to the partition if it is already open and to every later
    /// [`open`](CacheStorage::open), including after a delete.
    pub fn set_capacity(&self, label: &PartitionLabel, max_entries: usize) {
        self.capacities.insert(label.clone(), max_entries);
        if let Some(partition) = self.get(label) {
            partition.set_capacity(max_entries);
        }
    }

    /// The registered entry cap of a partition.
    pub fn capacity(&self, label: &PartitionLabel) -> Option<usize> {
        self.capacities.get(label).map(|entry| *entry)
    }

    /// Returns the partition with this name, creating it if needed.
    pub fn open(&self, label: &PartitionLabel) -> Arc<MemoryPartition> {
        self.partitions
            .entry(label.clone())
            .or_insert_with(|| {
                let partition = match self.capacity(label) {
                    Some(max_entries) => MemoryPartition::with_capacity(label.clone(), max_entries),
                    None => MemoryPartition::new(label.clone()),
                };
                Arc::new(partition)
            })
            .clone()
    }

    /// Returns the partition if it has been opened.
    pub fn get(&self, label: &PartitionLabel) -> Option<Arc<MemoryPartition>> {
        self.partitions.get(label).map(|entry| entry.clone())
    }

    /// Names of all open partitions, sorted.
    pub fn keys(&self) -> Vec<PartitionLabel> {
        let mut labels: Vec<_> = self.partitions.iter().map(|e| e.key().clone()).collect();
        labels.sort();
        labels
    }

    /// Removes a partition with all of its entries.
    pub fn delete(&self, label: &PartitionLabel) -> bool {
        let removed = self.partitions.remove(label).is_some();
        if removed {
            debug!(partition = %label, "deleted cache partition");
        }
        removed
    }

    /// Looks `key` up in every partition, in name order.
    pub async fn match_any(&self, key: &str) -> BackendResult<Option<FetchResponse>> {
        for label in self.keys() {
            let Some(partition) = self.get(&label) else {
                continue;
            };
            if let Some(response) = partition.read(key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

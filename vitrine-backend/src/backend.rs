use std::sync::Arc;

use async_trait::async_trait;
use vitrine_core::{FetchResponse, PartitionLabel};

use crate::{BackendError, DeleteStatus, Expiration};

pub type BackendResult<T> = Result<T, BackendError>;

/// A cache partition keyed by request URL.
///
/// Implementations must treat entries past their maximum age as absent on
/// [`read`](Backend::read) and may drop them at that moment.
#[async_trait]
pub trait Backend: Sync + Send {
    async fn read(&self, key: &str) -> BackendResult<Option<FetchResponse>>;

    async fn write(
        &self,
        key: &str,
        value: FetchResponse,
        expiration: &Expiration,
    ) -> BackendResult<()>;

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus>;

    /// Keys currently stored, oldest first. Expired entries may be included.
    async fn keys(&self) -> BackendResult<Vec<String>>;

    /// Drops every expired entry and returns how many were removed.
    async fn purge_expired(&self) -> BackendResult<usize>;

    /// Sum of stored body sizes in bytes.
    async fn body_size(&self) -> BackendResult<u64>;

    /// Returns the partition name used in routing, metrics and tracing.
    fn label(&self) -> PartitionLabel;
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn read(&self, key: &str) -> BackendResult<Option<FetchResponse>> {
        (**self).read(key).await
    }

    async fn write(
        &self,
        key: &str,
        value: FetchResponse,
        expiration: &Expiration,
    ) -> BackendResult<()> {
        (**self).write(key, value, expiration).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn keys(&self) -> BackendResult<Vec<String>> {
        (**self).keys().await
    }

    async fn purge_expired(&self) -> BackendResult<usize> {
        (**self).purge_expired().await
    }

    async fn body_size(&self) -> BackendResult<u64> {
        (**self).body_size().await
    }

    fn label(&self) -> PartitionLabel {
        (**self).label()
    }
}

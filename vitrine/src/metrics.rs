//! Metrics declaration and recording.

use vitrine_core::PartitionLabel;

use crate::context::ResponseSource;
use crate::route::Strategy;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Track responses served from a partition (fresh or stale).
    pub static ref CACHE_HIT_COUNTER: &'static str = {
        metrics::describe_counter!(
            "vitrine_cache_hit_total",
            "Total number of responses served from a cache partition."
        );
        "vitrine_cache_hit_total"
    };
    /// Track responses that had to come from the network.
    pub static ref CACHE_MISS_COUNTER: &'static str = {
        metrics::describe_counter!(
            "vitrine_cache_miss_total",
            "Total number of routed responses served from the network."
        );
        "vitrine_cache_miss_total"
    };
    /// Track responses produced by the error fallback.
    pub static ref FALLBACK_COUNTER: &'static str = {
        metrics::describe_counter!(
            "vitrine_fallback_total",
            "Total number of responses produced after a routed fetch failed."
        );
        "vitrine_fallback_total"
    };
    /// Track number of background revalidations spawned.
    pub static ref OFFLOAD_TASKS_SPAWNED: &'static str = {
        metrics::describe_counter!(
            "vitrine_offload_tasks_spawned_total",
            "Total number of background revalidation tasks spawned."
        );
        "vitrine_offload_tasks_spawned_total"
    };
    /// Track number of background revalidations skipped as duplicates.
    pub static ref OFFLOAD_TASKS_DEDUPLICATED: &'static str = {
        metrics::describe_counter!(
            "vitrine_offload_tasks_deduplicated_total",
            "Total number of revalidation tasks skipped because one was already in flight."
        );
        "vitrine_offload_tasks_deduplicated_total"
    };
}

/// Record one routed response.
///
/// When the `metrics` feature is disabled this is a no-op.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_served(strategy: Strategy, source: ResponseSource, partition: &PartitionLabel) {
    let counter = match source {
        ResponseSource::Cache | ResponseSource::Stale => *CACHE_HIT_COUNTER,
        ResponseSource::Network => *CACHE_MISS_COUNTER,
        ResponseSource::Fallback => *FALLBACK_COUNTER,
    };
    metrics::counter!(
        counter,
        "strategy" => strategy.as_str(),
        "partition" => partition.to_string()
    )
    .increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_served(_strategy: Strategy, _source: ResponseSource, _partition: &PartitionLabel) {}

/// Record one fallback response produced by the worker.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_fallback() {
    metrics::counter!(*FALLBACK_COUNTER).increment(1);
}

/// No-op version when metrics feature is disabled.
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_fallback() {}

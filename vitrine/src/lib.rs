//! Cache routing for a static showcase site.
//!
//! A [`CacheWorker`] sits between a page and the network. Every intercepted
//! `GET` is matched against an ordered [`RouteTable`]; the first matching
//! route picks a [`Strategy`], a partition and an [`Expiration`]. When the
//! routed fetch fails the worker falls back to any cached copy, then to a
//! built-in offline page or image, then to `503`.
//!
//! ```ignore
//! use vitrine::{CacheWorker, WorkerConfig, showcase};
//!
//! let worker = CacheWorker::new(showcase::routes()?, network, WorkerConfig::new("https://example.com/")?);
//! worker.install(showcase::PRECACHE_ASSETS).await?;
//! worker.activate();
//! let response = worker.handle_fetch(&request).await;
//! ```
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Response provenance.
///
/// [`Served`](context::Served) pairs a response with the
/// [`ResponseSource`](context::ResponseSource) it came from.
pub mod context;

/// Error types for routed fetches and worker lifecycle operations.
pub mod error;

/// Metrics collection for cache observability.
///
/// With the `metrics` feature enabled this module registers counters for
/// hits, misses, fallbacks and background revalidations.
pub mod metrics;

/// Background task offloading for stale-while-revalidate.
pub mod offload;

/// Routes, strategies and the routing table.
pub mod route;

/// Route table and precache list of the business showcase template.
pub mod showcase;

/// One handler per caching strategy.
pub mod strategy;

pub mod worker;

pub use context::{ResponseSource, Served};
pub use error::CacheError;
pub use offload::{OffloadConfig, OffloadManager, TimeoutPolicy};
pub use route::{CacheRoute, RoutePattern, RouteTable, Strategy};
pub use worker::{CacheWorker, MessageReply, WorkerConfig, WorkerMessage};

pub use vitrine_backend::{Backend, CacheStorage, Expiration, MemoryPartition};
pub use vitrine_core::{
    Destination, FetchRequest, FetchResponse, PartitionLabel, RequestMode, Upstream,
    UpstreamError, UpstreamResult,
};

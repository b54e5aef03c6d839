//! Request interception worker.
//!
//! [`CacheWorker`] ties a [`RouteTable`] to partitions and the network and
//! exposes the lifecycle of a page's request intermediary:
//!
//! - **install**: precache static assets into the static partition
//! - **activate**: delete partitions left behind by older versions
//! - **fetch**: route a request, falling back to cached or synthesized
//!   responses when the routed fetch fails
//! - **message**: handle control messages from pages
//!
//! The worker is cheap to clone; clones share partitions and state.

mod fallback;
mod message;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use http::Method;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, error, warn};
use url::Url;
use vitrine_backend::{Backend, CacheStorage, Expiration};
use vitrine_core::{
    Destination, FetchRequest, FetchResponse, Offload, PartitionLabel, RequestMode, Upstream,
};

pub use fallback::{offline_image, offline_page, service_unavailable};
pub use message::{MessageReply, WorkerMessage};

use crate::context::{ResponseSource, Served};
use crate::error::CacheError;
use crate::metrics::record_fallback;
use crate::offload::OffloadManager;
use crate::route::RouteTable;
use crate::showcase;
use crate::strategy::{self, StrategyContext};

/// Worker settings that are not part of the route table.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base URL precache assets and the offline page are resolved against.
    pub scope: Url,
    /// Partition receiving precached assets.
    pub static_cache: PartitionLabel,
    /// Partitions kept on activation. Empty means "every partition named by
    /// the route table plus the static partition".
    pub current_caches: Vec<PartitionLabel>,
    /// Path of the page served to offline navigations, relative to `scope`.
    pub offline_page: String,
    /// Period of the background expired-entry cleanup.
    pub cleanup_interval: Duration,
}

impl WorkerConfig {
    /// Default settings for a worker serving `scope`.
    pub fn new(scope: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            scope: Url::parse(scope)?,
            static_cache: showcase::STATIC_CACHE,
            current_caches: Vec::new(),
            offline_page: "./index.html".to_owned(),
            cleanup_interval: Duration::from_secs(24 * 60 * 60),
        })
    }
}

struct WorkerInner<U, O> {
    routes: RouteTable,
    storage: CacheStorage,
    upstream: Arc<U>,
    offload: O,
    config: WorkerConfig,
    skip_waiting: AtomicBool,
}

/// Routes intercepted requests through caching strategies.
///
/// # Type Parameters
///
/// * `U` - The network ([`Upstream`])
/// * `O` - Background executor for stale-while-revalidate ([`Offload`]).
///   Default: [`OffloadManager`].
pub struct CacheWorker<U, O = OffloadManager> {
    inner: Arc<WorkerInner<U, O>>,
}

impl<U, O> Clone for CacheWorker<U, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U, O> std::fmt::Debug for CacheWorker<U, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheWorker")
            .field("routes", &self.inner.routes.routes().len())
            .field("partitions", &self.inner.storage.keys())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl<U> CacheWorker<U, OffloadManager>
where
    U: Upstream + 'static,
{
    /// Creates a worker with fresh storage and a default offload manager.
    pub fn new(routes: RouteTable, upstream: U, config: WorkerConfig) -> Self {
        Self::with_parts(
            routes,
            CacheStorage::new(),
            upstream,
            OffloadManager::default(),
            config,
        )
    }
}

impl<U, O> CacheWorker<U, O>
where
    U: Upstream + 'static,
    O: Offload + 'static,
{
    /// Creates a worker from explicit parts.
    ///
    /// Each partition named by `routes` is capped at the largest entry limit
    /// among the routes that write to it.
    pub fn with_parts(
        routes: RouteTable,
        storage: CacheStorage,
        upstream: U,
        offload: O,
        config: WorkerConfig,
    ) -> Self {
        for (label, max_entries) in routes.capacities() {
            storage.set_capacity(&label, max_entries);
        }
        Self {
            inner: Arc::new(WorkerInner {
                routes,
                storage,
                upstream: Arc::new(upstream),
                offload,
                config,
                skip_waiting: AtomicBool::new(false),
            }),
        }
    }

    /// The routing table.
    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    /// The partitions.
    pub fn storage(&self) -> &CacheStorage {
        &self.inner.storage
    }

    /// The background executor.
    pub fn offload(&self) -> &O {
        &self.inner.offload
    }

    /// Whether the worker asked to activate without waiting.
    pub fn is_skip_waiting(&self) -> bool {
        self.inner.skip_waiting.load(Ordering::SeqCst)
    }

    /// Precaches `assets` into the static partition.
    ///
    /// All assets are fetched before any is stored, so a failure leaves the
    /// partition untouched. Failures are logged and returned; the worker keeps
    /// running either way. On success the worker skips waiting.
    pub async fn install<S: AsRef<str>>(&self, assets: &[S]) -> Result<usize, CacheError> {
        debug!(count = assets.len(), "caching static assets");
        match self.precache(assets).await {
            Ok(count) => {
                self.inner.skip_waiting.store(true, Ordering::SeqCst);
                debug!(count, "static assets cached");
                Ok(count)
            }
            Err(err) => {
                error!(error = %err, "failed to cache static assets");
                Err(err)
            }
        }
    }

    async fn precache<S: AsRef<str>>(&self, assets: &[S]) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(assets.len());
        for asset in assets {
            let asset = asset.as_ref();
            let url = self
                .inner
                .config
                .scope
                .join(asset)
                .map_err(|source| CacheError::InvalidUrl {
                    asset: asset.to_owned(),
                    source,
                })?;
            let response = self.inner.upstream.call(&FetchRequest::get(url.as_str())).await?;
            if !response.is_ok() {
                return Err(CacheError::BadStatus {
                    url: url.into(),
                    status: response.status(),
                });
            }
            fetched.push((url, response));
        }

        let partition = self.inner.storage.open(&self.inner.config.static_cache);
        let count = fetched.len();
        for (url, response) in fetched {
            partition
                .write(url.as_str(), response, &Expiration::UNBOUNDED)
                .await?;
        }
        Ok(count)
    }

    /// Deletes partitions that are not current and returns their names.
    pub fn activate(&self) -> Vec<PartitionLabel> {
        let current = self.current_caches();
        let mut deleted = Vec::new();
        for label in self.inner.storage.keys() {
            if !current.contains(&label) && self.inner.storage.delete(&label) {
                debug!(partition = %label, "deleting old cache");
                deleted.push(label);
            }
        }
        deleted
    }

    fn current_caches(&self) -> Vec<PartitionLabel> {
        if !self.inner.config.current_caches.is_empty() {
            return self.inner.config.current_caches.clone();
        }
        let mut current = self.inner.routes.partitions();
        if !current.contains(&self.inner.config.static_cache) {
            current.push(self.inner.config.static_cache.clone());
        }
        current
    }

    /// Handles an intercepted fetch.
    ///
    /// Returns `None` for requests the worker does not intercept (non-GET or
    /// non-http schemes); the page then performs them itself. Intercepted
    /// requests always produce a response.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Option<FetchResponse> {
        if request.method() != Method::GET || !request.is_http() {
            return None;
        }

        let response = match self.route(request).await {
            Ok(served) => served.response,
            Err(err) => {
                warn!(url = request.url(), error = %err, "fetch failed");
                self.fallback(request).await
            }
        };
        Some(response)
    }

    /// Applies the matching route, or passes through to the network when no
    /// route matches.
    pub async fn route(&self, request: &FetchRequest) -> Result<Served, CacheError> {
        let Some(route) = self.inner.routes.resolve_request(request) else {
            debug!(url = request.url(), "no route, passing through");
            let response = self.inner.upstream.call(request).await?;
            return Ok(Served::new(response, ResponseSource::Network));
        };

        debug!(
            url = request.url(),
            strategy = %route.strategy(),
            partition = %route.cache_name(),
            "route matched"
        );
        strategy::execute(
            route.strategy(),
            StrategyContext {
                request,
                partition: self.inner.storage.open(route.cache_name()),
                expiration: *route.expiration(),
                upstream: Arc::clone(&self.inner.upstream),
                offload: &self.inner.offload,
            },
        )
        .await
    }

    /// Produces a response after a routed fetch failed.
    ///
    /// Order: the URL in any partition, then the offline page for
    /// navigations, then the offline image for images, then `503`.
    pub async fn fallback(&self, request: &FetchRequest) -> FetchResponse {
        record_fallback();
        match self.inner.storage.match_any(request.url()).await {
            Ok(Some(cached)) => {
                debug!(url = request.url(), "serving fallback from cache");
                return cached;
            }
            Ok(None) => {}
            Err(err) => warn!(url = request.url(), error = %err, "fallback lookup failed"),
        }

        if request.mode() == RequestMode::Navigate {
            return self.cached_offline_page().await;
        }
        if request.destination() == Destination::Image {
            return offline_image();
        }
        service_unavailable()
    }

    async fn cached_offline_page(&self) -> FetchResponse {
        let config = &self.inner.config;
        if let Some(partition) = self.inner.storage.get(&config.static_cache)
            && let Ok(url) = config.scope.join(&config.offline_page)
            && let Ok(Some(page)) = partition.read(url.as_str()).await
        {
            return page;
        }
        offline_page()
    }

    /// Purges expired entries from every partition.
    pub async fn cleanup_expired(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for label in self.inner.storage.keys() {
            if let Some(partition) = self.inner.storage.get(&label) {
                let purged = partition.purge_expired().await?;
                if purged > 0 {
                    debug!(partition = %label, purged, "removed expired entries");
                }
                removed += purged;
            }
        }
        Ok(removed)
    }

    /// Runs [`cleanup_expired`](Self::cleanup_expired) every
    /// `cleanup_interval`, starting one interval from now.
    pub fn spawn_periodic_cleanup(&self) -> JoinHandle<()> {
        let worker = self.clone();
        let every = self.inner.config.cleanup_interval;
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            loop {
                ticker.tick().await;
                if let Err(err) = worker.cleanup_expired().await {
                    warn!(error = %err, "periodic cache cleanup failed");
                }
            }
        })
    }

    /// Total size of stored bodies across partitions.
    pub async fn cache_size(&self) -> Result<u64, CacheError> {
        let mut total = 0;
        for label in self.inner.storage.keys() {
            if let Some(partition) = self.inner.storage.get(&label) {
                total += partition.body_size().await?;
            }
        }
        Ok(total)
    }

    /// Handles a control message; only `GET_CACHE_SIZE` produces a reply.
    pub async fn handle_message(&self, message: WorkerMessage) -> Option<MessageReply> {
        debug!(?message, "message received");
        match message {
            WorkerMessage::SkipWaiting => {
                self.inner.skip_waiting.store(true, Ordering::SeqCst);
                None
            }
            WorkerMessage::CleanupCaches => {
                if let Err(err) = self.cleanup_expired().await {
                    warn!(error = %err, "cache cleanup failed");
                }
                None
            }
            WorkerMessage::GetCacheSize => match self.cache_size().await {
                Ok(size) => Some(MessageReply::CacheSize { size }),
                Err(err) => {
                    warn!(error = %err, "could not compute cache size");
                    None
                }
            },
            WorkerMessage::Unknown => {
                warn!("unknown message type");
                None
            }
        }
    }
}

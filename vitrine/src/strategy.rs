//! One handler per [`Strategy`] variant.
//!
//! Handlers only ever store 2xx responses; anything else is returned to the
//! caller untouched.

use std::sync::Arc;

use tracing::{debug, warn};
use vitrine_backend::{Backend, Expiration};
use vitrine_core::{FetchRequest, FetchResponse, Offload, Upstream};

use crate::context::{ResponseSource, Served};
use crate::error::CacheError;
use crate::metrics::record_served;
use crate::route::Strategy;

/// Everything a handler needs for one request.
pub struct StrategyContext<'a, B, U, O> {
    /// The intercepted request.
    pub request: &'a FetchRequest,
    /// Partition named by the matched route.
    pub partition: Arc<B>,
    /// Limits named by the matched route.
    pub expiration: Expiration,
    /// The network.
    pub upstream: Arc<U>,
    /// Executor for background revalidation.
    pub offload: &'a O,
}

/// Runs the handler for `strategy`.
pub async fn execute<B, U, O>(
    strategy: Strategy,
    ctx: StrategyContext<'_, B, U, O>,
) -> Result<Served, CacheError>
where
    B: Backend + 'static,
    U: Upstream + 'static,
    O: Offload,
{
    let partition = ctx.partition.label();
    let served = match strategy {
        Strategy::CacheFirst => cache_first(ctx).await,
        Strategy::NetworkFirst => network_first(ctx).await,
        Strategy::StaleWhileRevalidate => stale_while_revalidate(ctx).await,
        Strategy::NetworkOnly => network_only(ctx).await,
        Strategy::CacheOnly => cache_only(ctx).await,
    }?;
    record_served(strategy, served.source, &partition);
    Ok(served)
}

async fn store<B: Backend + ?Sized>(
    partition: &B,
    url: &str,
    response: &FetchResponse,
    expiration: &Expiration,
) -> Result<(), CacheError> {
    if response.is_ok() {
        partition.write(url, response.clone(), expiration).await?;
    }
    Ok(())
}

async fn cache_first<B, U, O>(ctx: StrategyContext<'_, B, U, O>) -> Result<Served, CacheError>
where
    B: Backend,
    U: Upstream,
{
    let url = ctx.request.url();
    if let Some(cached) = ctx.partition.read(url).await? {
        debug!(url, "serving from cache");
        return Ok(Served::new(cached, ResponseSource::Cache));
    }

    debug!(url, "fetching from network");
    let response = ctx.upstream.call(ctx.request).await?;
    store(&*ctx.partition, url, &response, &ctx.expiration).await?;
    Ok(Served::new(response, ResponseSource::Network))
}

async fn network_first<B, U, O>(ctx: StrategyContext<'_, B, U, O>) -> Result<Served, CacheError>
where
    B: Backend,
    U: Upstream,
{
    let url = ctx.request.url();
    debug!(url, "trying network first");
    match ctx.upstream.call(ctx.request).await {
        Ok(response) => {
            store(&*ctx.partition, url, &response, &ctx.expiration).await?;
            Ok(Served::new(response, ResponseSource::Network))
        }
        Err(error) => {
            debug!(url, %error, "network failed, trying cache");
            match ctx.partition.read(url).await? {
                Some(cached) => Ok(Served::new(cached, ResponseSource::Cache)),
                None => Err(error.into()),
            }
        }
    }
}

async fn stale_while_revalidate<B, U, O>(
    ctx: StrategyContext<'_, B, U, O>,
) -> Result<Served, CacheError>
where
    B: Backend + 'static,
    U: Upstream + 'static,
    O: Offload,
{
    let url = ctx.request.url();
    let Some(cached) = ctx.partition.read(url).await? else {
        debug!(url, "no cache, waiting for network");
        let response = ctx.upstream.call(ctx.request).await?;
        store(&*ctx.partition, url, &response, &ctx.expiration).await?;
        return Ok(Served::new(response, ResponseSource::Network));
    };

    let request = ctx.request.clone();
    let partition = Arc::clone(&ctx.partition);
    let upstream = Arc::clone(&ctx.upstream);
    let expiration = ctx.expiration;
    ctx.offload.spawn(url.to_owned(), async move {
        let url = request.url();
        match upstream.call(&request).await {
            Ok(response) => {
                if let Err(error) = store(&*partition, url, &response, &expiration).await {
                    warn!(url, %error, "background revalidation could not store response");
                }
            }
            Err(error) => warn!(url, %error, "background fetch failed"),
        }
    });

    debug!(url, "serving stale from cache");
    Ok(Served::new(cached, ResponseSource::Stale))
}

async fn network_only<B, U, O>(ctx: StrategyContext<'_, B, U, O>) -> Result<Served, CacheError>
where
    U: Upstream,
{
    let response = ctx.upstream.call(ctx.request).await?;
    Ok(Served::new(response, ResponseSource::Network))
}

async fn cache_only<B, U, O>(ctx: StrategyContext<'_, B, U, O>) -> Result<Served, CacheError>
where
    B: Backend,
{
    let url = ctx.request.url();
    match ctx.partition.read(url).await? {
        Some(cached) => Ok(Served::new(cached, ResponseSource::Cache)),
        None => Err(CacheError::NotCached {
            url: url.to_owned(),
        }),
    }
}

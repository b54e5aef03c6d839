//! Network access for cache strategies.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::request::FetchRequest;
use crate::response::FetchResponse;

/// Failure to obtain a response from the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The request never produced a response (offline, DNS, reset).
    #[error("network request to {url} failed: {reason}")]
    Network {
        /// Requested URL.
        url: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl UpstreamError {
    /// Shorthand for [`UpstreamError::Network`].
    pub fn network(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for upstream calls.
pub type UpstreamResult = Result<FetchResponse, UpstreamError>;

/// Trait for reaching the network with intercepted requests.
///
/// A non-2xx status is still a response; only transport failures are errors.
///
/// # Examples
///
/// ```rust,ignore
/// use vitrine_core::{FetchRequest, FetchResponse, Upstream, UpstreamResult};
///
/// struct Static;
///
/// #[async_trait::async_trait]
/// impl Upstream for Static {
///     async fn call(&self, _req: &FetchRequest) -> UpstreamResult {
///         Ok(FetchResponse::ok("hello"))
///     }
/// }
/// ```
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform the request.
    async fn call(&self, req: &FetchRequest) -> UpstreamResult;
}

#[async_trait]
impl<U> Upstream for Arc<U>
where
    U: Upstream + ?Sized,
{
    async fn call(&self, req: &FetchRequest) -> UpstreamResult {
        (**self).call(req).await
    }
}

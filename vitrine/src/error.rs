use http::StatusCode;
use thiserror::Error;
use vitrine_backend::BackendError;
use vitrine_core::UpstreamError;

/// Error type for routed fetches and worker lifecycle operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The network could not be reached.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A partition operation failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Cache-only route with no stored entry.
    #[error("resource not in cache: {url}")]
    NotCached {
        /// Requested URL.
        url: String,
    },

    /// A precache asset answered with a non-2xx status.
    #[error("precache request for {url} returned {status}")]
    BadStatus {
        /// Requested URL.
        url: String,
        /// Status returned by the network.
        status: StatusCode,
    },

    /// A precache asset could not be resolved against the worker scope.
    #[error("cannot resolve {asset} against scope: {source}")]
    InvalidUrl {
        /// Asset path as given.
        asset: String,
        /// Parse failure.
        source: url::ParseError,
    },
}

//! Intercepted fetch requests.

use http::Method;
use serde::{Deserialize, Serialize};

/// Request mode as reported by the browser fetch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level navigation.
    Navigate,
    /// Same-origin subresource.
    SameOrigin,
    /// Opaque cross-origin request.
    NoCors,
    /// CORS request.
    #[default]
    Cors,
}

/// What the requested resource will be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// HTML document.
    Document,
    /// Image element or CSS image.
    Image,
    /// Stylesheet.
    Style,
    /// Script.
    Script,
    /// Web font.
    Font,
    /// `fetch()` or XHR with no specific destination.
    #[default]
    Empty,
}

/// A fetch intercepted by the cache worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    method: Method,
    url: String,
    mode: RequestMode,
    destination: Destination,
}

impl FetchRequest {
    /// Creates a request with an explicit method.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            mode: RequestMode::default(),
            destination: Destination::default(),
        }
    }

    /// Creates a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a `GET` navigation request for a document.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::get(url)
            .with_mode(RequestMode::Navigate)
            .with_destination(Destination::Document)
    }

    /// Sets the request mode.
    pub fn with_mode(self, mode: RequestMode) -> Self {
        Self { mode, ..self }
    }

    /// Sets the request destination.
    pub fn with_destination(self, destination: Destination) -> Self {
        Self {
            destination,
            ..self
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request mode.
    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    /// Request destination.
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Whether the URL uses an `http` or `https` scheme.
    pub fn is_http(&self) -> bool {
        self.url.starts_with("http")
    }
}

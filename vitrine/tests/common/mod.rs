//! Shared fixtures for worker tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use vitrine::{
    CacheRoute, CacheWorker, Expiration, FetchRequest, FetchResponse, RoutePattern, RouteTable,
    Strategy, Upstream, UpstreamError, UpstreamResult, WorkerConfig,
};

pub const SCOPE: &str = "https://example.com/";

/// In-memory network with an offline switch and a call log.
#[derive(Debug, Default)]
pub struct MockNetwork {
    responses: Mutex<HashMap<String, FetchResponse>>,
    offline: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.serve_response(url, FetchResponse::ok(body.to_owned()));
    }

    pub fn serve_response(&self, url: &str, response: FetchResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_owned(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl Upstream for MockNetwork {
    async fn call(&self, req: &FetchRequest) -> UpstreamResult {
        self.calls.lock().unwrap().push(req.url().to_owned());
        if self.offline.load(Ordering::SeqCst) {
            return Err(UpstreamError::network(req.url(), "offline"));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(req.url())
            .cloned()
            .unwrap_or_else(|| {
                FetchResponse::with_content_type(StatusCode::NOT_FOUND, "text/plain", "Not Found")
            }))
    }
}

pub fn single_route(pattern: &str, strategy: Strategy, expiration: Expiration) -> RouteTable {
    RouteTable::new(vec![CacheRoute::new(
        RoutePattern::url(pattern).unwrap(),
        strategy,
        "test-cache",
        expiration,
    )])
}

pub fn worker(routes: RouteTable, network: &Arc<MockNetwork>) -> CacheWorker<Arc<MockNetwork>> {
    CacheWorker::new(routes, Arc::clone(network), WorkerConfig::new(SCOPE).unwrap())
}

pub fn body(response: &FetchResponse) -> &str {
    std::str::from_utf8(response.body()).unwrap()
}

use vitrine_core::FetchResponse;

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Fresh from the partition.
    Cache,
    /// From the partition, with a background refresh started.
    Stale,
    /// From the network.
    Network,
    /// Synthesized or looked up after the routed fetch failed.
    Fallback,
}

impl ResponseSource {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Cache => "cache",
            ResponseSource::Stale => "stale",
            ResponseSource::Network => "network",
            ResponseSource::Fallback => "fallback",
        }
    }
}

/// A response together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    /// The response handed back to the page.
    pub response: FetchResponse,
    /// Where it came from.
    pub source: ResponseSource,
}

impl Served {
    pub(crate) fn new(response: FetchResponse, source: ResponseSource) -> Self {
        Self { response, source }
    }
}

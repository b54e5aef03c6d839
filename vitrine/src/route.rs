//! Ordered routing table.
//!
//! A [`RouteTable`] is a priority-ordered list of [`CacheRoute`]s. Lookup
//! scans in declaration order and the first matching route decides the
//! strategy, the partition and the expiration for the request. Rules are
//! never combined.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use vitrine_backend::Expiration;
use vitrine_core::{Destination, FetchRequest, PartitionLabel};

/// Caching strategy applied to a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Serve from the partition, fetch and store on a miss.
    CacheFirst,
    /// Fetch first, fall back to the partition when the network fails.
    NetworkFirst,
    /// Serve from the partition and refresh it in the background.
    StaleWhileRevalidate,
    /// Never touch the partition.
    NetworkOnly,
    /// Never touch the network.
    CacheOnly,
}

impl Strategy {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CacheFirst => "cache-first",
            Strategy::NetworkFirst => "network-first",
            Strategy::StaleWhileRevalidate => "stale-while-revalidate",
            Strategy::NetworkOnly => "network-only",
            Strategy::CacheOnly => "cache-only",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a route is matched against.
#[derive(Debug, Clone)]
pub enum RoutePattern {
    /// Regular expression tested against the full request URL.
    Url(Regex),
    /// Exact request destination.
    Destination(Destination),
}

impl RoutePattern {
    /// Compiles a URL pattern.
    pub fn url(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(RoutePattern::Url)
    }
}

/// One entry of the routing table.
#[derive(Debug, Clone)]
pub struct CacheRoute {
    pattern: RoutePattern,
    strategy: Strategy,
    cache_name: PartitionLabel,
    expiration: Expiration,
}

impl CacheRoute {
    /// Creates a route.
    pub fn new(
        pattern: RoutePattern,
        strategy: Strategy,
        cache_name: impl Into<PartitionLabel>,
        expiration: Expiration,
    ) -> Self {
        Self {
            pattern,
            strategy,
            cache_name: cache_name.into(),
            expiration,
        }
    }

    /// Matcher of this route.
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Strategy applied on match.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Partition read and written on match.
    pub fn cache_name(&self) -> &PartitionLabel {
        &self.cache_name
    }

    /// Limits applied to writes made through this route.
    pub fn expiration(&self) -> &Expiration {
        &self.expiration
    }

    /// Tests the URL. Destination routes never match a bare URL.
    pub fn matches_url(&self, url: &str) -> bool {
        match &self.pattern {
            RoutePattern::Url(regex) => regex.is_match(url),
            RoutePattern::Destination(_) => false,
        }
    }

    /// Tests the URL or the destination, depending on the pattern kind.
    pub fn matches(&self, request: &FetchRequest) -> bool {
        match &self.pattern {
            RoutePattern::Url(regex) => regex.is_match(request.url()),
            RoutePattern::Destination(destination) => request.destination() == *destination,
        }
    }
}

/// Priority-ordered list of routes.
///
/// # Example
///
/// ```
/// use vitrine::route::{CacheRoute, RoutePattern, RouteTable, Strategy};
/// use vitrine_backend::Expiration;
///
/// let table = RouteTable::new(vec![CacheRoute::new(
///     RoutePattern::url(r"/api/").unwrap(),
///     Strategy::NetworkFirst,
///     "dynamic",
///     Expiration::new(50, 300),
/// )]);
///
/// let route = table.resolve("https://example.com/api/items").unwrap();
/// assert_eq!(route.strategy(), Strategy::NetworkFirst);
/// assert!(table.resolve("https://example.com/about").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<CacheRoute>,
}

impl RouteTable {
    /// Creates a table; `routes` are checked in the given order.
    pub fn new(routes: Vec<CacheRoute>) -> Self {
        Self { routes }
    }

    /// Appends a route with the lowest priority.
    pub fn push(&mut self, route: CacheRoute) {
        self.routes.push(route);
    }

    /// All routes in priority order.
    pub fn routes(&self) -> &[CacheRoute] {
        &self.routes
    }

    /// First route whose URL pattern matches, or `None` for "pass through".
    pub fn resolve(&self, url: &str) -> Option<&CacheRoute> {
        self.routes.iter().find(|route| route.matches_url(url))
    }

    /// First route matching the URL or the destination of `request`.
    pub fn resolve_request(&self, request: &FetchRequest) -> Option<&CacheRoute> {
        self.routes.iter().find(|route| route.matches(request))
    }

    /// Distinct partitions referenced by the table, in first-use order.
    pub fn partitions(&self) -> Vec<PartitionLabel> {
        let mut labels: Vec<PartitionLabel> = Vec::new();
        for route in &self.routes {
            if !labels.contains(&route.cache_name) {
                labels.push(route.cache_name.clone());
            }
        }
        labels
    }

    /// Entry cap of each partition: the largest cap among the routes that
    /// write to it. Partitions whose routes are all uncapped are left out.
    pub fn capacities(&self) -> Vec<(PartitionLabel, usize)> {
        let mut caps: Vec<(PartitionLabel, usize)> = Vec::new();
        for route in &self.routes {
            let Some(max_entries) = route.expiration.max_entries else {
                continue;
            };
            match caps.iter_mut().find(|(label, _)| *label == route.cache_name) {
                Some((_, cap)) => *cap = (*cap).max(max_entries),
                None => caps.push((route.cache_name.clone(), max_entries)),
            }
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(pattern: &str, strategy: Strategy, cache: &str) -> CacheRoute {
        CacheRoute::new(
            RoutePattern::url(pattern).unwrap(),
            strategy,
            cache,
            Expiration::UNBOUNDED,
        )
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new(vec![
            route(r"\.css$", Strategy::StaleWhileRevalidate, "static"),
            route(r".*", Strategy::NetworkOnly, "none"),
        ]);

        let route = table.resolve("https://x.test/style.css").unwrap();
        assert_eq!(route.strategy(), Strategy::StaleWhileRevalidate);
    }

    #[test]
    fn test_destination_route_ignores_bare_urls() {
        let table = RouteTable::new(vec![CacheRoute::new(
            RoutePattern::Destination(Destination::Font),
            Strategy::CacheFirst,
            "fonts",
            Expiration::UNBOUNDED,
        )]);

        assert!(table.resolve("https://x.test/f.woff2").is_none());
        let request = FetchRequest::get("https://x.test/f.woff2").with_destination(Destination::Font);
        assert!(table.resolve_request(&request).is_some());
    }

    #[test]
    fn test_partitions_are_deduplicated_in_order() {
        let table = RouteTable::new(vec![
            route("a", Strategy::CacheFirst, "static"),
            route("b", Strategy::CacheFirst, "fonts"),
            route("c", Strategy::CacheFirst, "static"),
        ]);
        assert_eq!(
            table.partitions(),
            vec![PartitionLabel::from("static"), PartitionLabel::from("fonts")]
        );
    }

    #[test]
    fn test_shared_partition_takes_largest_cap() {
        let capped = |pattern: &str, cache: &str, max_entries: usize| {
            CacheRoute::new(
                RoutePattern::url(pattern).unwrap(),
                Strategy::CacheFirst,
                cache,
                Expiration::new(max_entries, 60),
            )
        };
        let table = RouteTable::new(vec![
            capped("a", "static", 100),
            capped("b", "static", 50),
            capped("c", "api", 20),
            route("d", Strategy::NetworkOnly, "loose"),
        ]);

        assert_eq!(
            table.capacities(),
            vec![
                (PartitionLabel::from("static"), 100),
                (PartitionLabel::from("api"), 20),
            ]
        );
    }

    #[test]
    fn test_strategy_serde_names() {
        assert_eq!(Strategy::StaleWhileRevalidate.to_string(), "stale-while-revalidate");
    }
}

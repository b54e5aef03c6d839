use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use vitrine::{CacheRoute, RoutePattern, RouteTable, Strategy, WorkerConfig, showcase};
use vitrine_backend::Expiration;
use vitrine_core::{Destination, PartitionLabel};

use crate::error::ConfigError;

/// Expiration block of a route.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigExpiration {
    /// Maximum entries kept in the partition.
    #[serde(default)]
    pub max_entries: Option<usize>,
    /// Maximum entry age, e.g. `30days` or `5m`.
    #[serde(default, with = "humantime_serde")]
    pub max_age: Option<Duration>,
}

impl From<ConfigExpiration> for Expiration {
    fn from(config: ConfigExpiration) -> Self {
        Expiration {
            max_entries: config.max_entries,
            max_age: config.max_age,
        }
    }
}

/// One route, matched either by URL pattern or by request destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigRoute {
    /// Regular expression tested against the full URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Request destination, e.g. `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
    /// Strategy applied on match.
    pub strategy: Strategy,
    /// Partition name.
    pub cache: PartitionLabel,
    /// Partition limits.
    #[serde(default)]
    pub expiration: ConfigExpiration,
}

impl ConfigRoute {
    fn into_route(self, name: &str) -> Result<CacheRoute, ConfigError> {
        let pattern = match (self.pattern, self.destination) {
            (Some(pattern), None) => {
                RoutePattern::url(&pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern,
                    source,
                })?
            }
            (None, Some(destination)) => RoutePattern::Destination(destination),
            _ => {
                return Err(ConfigError::Matcher {
                    route: name.to_owned(),
                });
            }
        };
        Ok(CacheRoute::new(
            pattern,
            self.strategy,
            self.cache,
            self.expiration.into(),
        ))
    }
}

/// Cache worker section.
///
/// Routes are keyed by name; declaration order is match priority.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    /// Base URL of the site.
    pub scope: String,
    /// Partition receiving precached assets.
    #[serde(default = "default_static_cache")]
    pub static_cache: PartitionLabel,
    /// Partitions kept on activation; empty keeps every partition in use.
    #[serde(default)]
    pub current_caches: Vec<PartitionLabel>,
    /// Offline page path relative to `scope`.
    #[serde(default = "default_offline_page")]
    pub offline_page: String,
    /// Period of expired-entry cleanup, e.g. `24h`.
    #[serde(default = "default_cleanup_interval", with = "humantime_serde")]
    pub cleanup_interval: Duration,
    /// Assets precached on install, relative to `scope`.
    #[serde(default)]
    pub precache: Vec<String>,
    /// Named routes in priority order.
    #[serde(default)]
    pub routes: IndexMap<String, ConfigRoute>,
}

fn default_static_cache() -> PartitionLabel {
    showcase::STATIC_CACHE
}

fn default_offline_page() -> String {
    "./index.html".to_owned()
}

fn default_cleanup_interval() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

impl CacheSettings {
    /// Compiles the routes in declaration order.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        let mut table = RouteTable::default();
        for (name, route) in &self.routes {
            table.push(route.clone().into_route(name)?);
        }
        Ok(table)
    }

    /// Builds the worker settings.
    ///
    /// With an explicit `current_caches` list, every partition a route or
    /// the precache writes to must be on it.
    pub fn worker_config(&self) -> Result<WorkerConfig, ConfigError> {
        if !self.current_caches.is_empty() {
            let used = std::iter::once(&self.static_cache)
                .chain(self.routes.values().map(|route| &route.cache));
            for label in used {
                if !self.current_caches.contains(label) {
                    return Err(ConfigError::UnknownPartition(label.clone()));
                }
            }
        }

        let mut config = WorkerConfig::new(&self.scope)?;
        config.static_cache = self.static_cache.clone();
        config.current_caches = self.current_caches.clone();
        config.offline_page = self.offline_page.clone();
        config.cleanup_interval = self.cleanup_interval;
        Ok(config)
    }
}

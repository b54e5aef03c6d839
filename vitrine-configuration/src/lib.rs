//! YAML configuration for vitrine.
//!
//! One document configures both the cache worker and the analytics
//! dispatcher:
//!
//! ```yaml
//! cache:
//!   scope: https://example.com/
//!   precache: [./, ./index.html]
//!   routes:
//!     images:
//!       pattern: '(?i)\.(?:png|jpg)$'
//!       strategy: cache-first
//!       cache: businesspro-static-v1.0.0
//!       expiration: { max_entries: 100, max_age: 30days }
//! analytics:
//!   require_consent: true
//!   poll_interval: 100ms
//! ```

mod analytics;
mod cache;
mod error;

use serde::{Deserialize, Serialize};

pub use analytics::AnalyticsSettings;
pub use cache::{CacheSettings, ConfigExpiration, ConfigRoute};
pub use error::ConfigError;

/// Root of a configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Cache worker settings; absent when only analytics is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheSettings>,
    /// Analytics settings.
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

impl Config {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }
}

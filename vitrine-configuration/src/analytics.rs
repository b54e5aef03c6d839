use std::time::Duration;

use serde::{Deserialize, Serialize};
use vitrine_analytics::DispatcherConfig;

/// Analytics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Drop events until consent is accepted.
    pub require_consent: bool,
    /// Backend polling period, e.g. `100ms`.
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    /// Delay before the performance report, e.g. `3s`.
    #[serde(with = "humantime_serde")]
    pub performance_delay: Duration,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        let defaults = DispatcherConfig::default();
        Self {
            require_consent: defaults.require_consent,
            poll_interval: defaults.poll_interval,
            performance_delay: defaults.performance_delay,
        }
    }
}

impl AnalyticsSettings {
    /// Builds the dispatcher configuration.
    pub fn into_dispatcher_config(self) -> DispatcherConfig {
        DispatcherConfig::builder()
            .require_consent(self.require_consent)
            .poll_interval(self.poll_interval)
            .performance_delay(self.performance_delay)
            .build()
    }
}

//! Session metadata merged into every sent event.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tokio::time::Instant;

use crate::reporter::EventParams;

/// Inner window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Window width.
    pub width: u32,
    /// Window height.
    pub height: u32,
}

/// Readers for the host environment.
pub trait Environment: Send + Sync {
    /// The browser user agent string.
    fn user_agent(&self) -> String;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;
}

/// Environment with fixed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    /// Reported user agent.
    pub user_agent: String,
    /// Reported viewport.
    pub viewport: Viewport,
}

impl StaticEnvironment {
    /// Creates a fixed environment.
    pub fn new(user_agent: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport: Viewport { width, height },
        }
    }
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

/// Copies `params` and adds the session fields.
///
/// Session fields replace caller keys with the same name.
pub(crate) fn enrich(
    params: &EventParams,
    session_start: Instant,
    environment: &dyn Environment,
) -> EventParams {
    let mut enriched = params.clone();
    let viewport = environment.viewport();
    enriched.insert(
        "session_duration".to_owned(),
        Value::from(session_seconds(session_start)),
    );
    enriched.insert(
        "timestamp".to_owned(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    enriched.insert(
        "user_agent".to_owned(),
        Value::from(environment.user_agent()),
    );
    enriched.insert("viewport_width".to_owned(), Value::from(viewport.width));
    enriched.insert("viewport_height".to_owned(), Value::from(viewport.height));
    enriched
}

/// Elapsed session time in whole seconds, rounded half up.
fn session_seconds(session_start: Instant) -> u64 {
    let millis = session_start.elapsed().as_millis();
    u64::try_from((millis + 500) / 1000).unwrap_or(u64::MAX)
}

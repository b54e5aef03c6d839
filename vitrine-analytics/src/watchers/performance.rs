use tokio::task::JoinHandle;
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::ReportError;
use crate::params;

/// Navigation timing marks, in milliseconds since the time origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct NavigationTiming {
    pub navigation_start: f64,
    pub domain_lookup_start: f64,
    pub domain_lookup_end: f64,
    pub connect_start: f64,
    pub connect_end: f64,
    pub response_start: f64,
    pub response_end: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    fn params(&self) -> crate::EventParams {
        let ms = |from: f64, to: f64| (to - from).round() as i64;
        params! {
            "dns_time" => ms(self.domain_lookup_start, self.domain_lookup_end),
            "connect_time" => ms(self.connect_start, self.connect_end),
            "response_time" => ms(self.response_start, self.response_end),
            "dom_load_time" => ms(self.navigation_start, self.dom_content_loaded_event_end),
            "window_load_time" => ms(self.navigation_start, self.load_event_end),
            "event_category" => "performance",
        }
    }
}

/// Source of the navigation timing entry.
pub trait TimingSource: Send + Sync {
    /// The entry, if the host exposes one.
    fn navigation_timing(&self) -> Option<NavigationTiming>;
}

impl<F> TimingSource for F
where
    F: Fn() -> Option<NavigationTiming> + Send + Sync,
{
    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self()
    }
}

/// Records `performance_metrics` once, `performance_delay` from now.
///
/// Nothing is recorded when `source` has no timing entry.
pub fn spawn_performance_report<S>(
    dispatcher: &Dispatcher,
    source: S,
) -> JoinHandle<Result<(), ReportError>>
where
    S: TimingSource + 'static,
{
    let dispatcher = dispatcher.clone();
    let delay = dispatcher.config().performance_delay;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match source.navigation_timing() {
            Some(timing) => dispatcher.record("performance_metrics", timing.params()),
            None => {
                debug!("navigation timing unavailable, skipping performance report");
                Ok(())
            }
        }
    })
}

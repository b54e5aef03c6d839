use crate::dispatcher::Dispatcher;
use crate::error::ReportError;

/// Depths reported by [`ScrollDepthWatcher`], in percent.
pub const SCROLL_THRESHOLDS: [u8; 5] = [25, 50, 75, 90, 100];

/// Scroll geometry at one scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    /// Vertical scroll offset.
    pub scroll_y: f64,
    /// Full document height.
    pub scroll_height: f64,
    /// Window height.
    pub inner_height: f64,
}

impl ScrollPosition {
    /// Scrolled share of the page, rounded to a whole percent.
    ///
    /// `None` when the page cannot scroll.
    pub fn percent(&self) -> Option<i64> {
        let scrollable = self.scroll_height - self.inner_height;
        if scrollable <= 0.0 {
            return None;
        }
        Some((self.scroll_y / scrollable * 100.0).round() as i64)
    }
}

/// Reports each of [`SCROLL_THRESHOLDS`] once, when the deepest scroll so
/// far first reaches it.
#[derive(Debug)]
pub struct ScrollDepthWatcher {
    dispatcher: Dispatcher,
    max_percent: i64,
    reported: Vec<u8>,
}

impl ScrollDepthWatcher {
    /// Creates a watcher for one page view.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            max_percent: 0,
            reported: Vec::with_capacity(SCROLL_THRESHOLDS.len()),
        }
    }

    /// Deepest scroll seen so far, in percent.
    pub fn max_percent(&self) -> i64 {
        self.max_percent
    }

    /// Handles a scroll notification and returns the thresholds it crossed.
    pub fn on_scroll(&mut self, position: ScrollPosition) -> Result<Vec<u8>, ReportError> {
        let Some(percent) = position.percent() else {
            return Ok(Vec::new());
        };
        self.max_percent = self.max_percent.max(percent);

        let crossed: Vec<u8> = SCROLL_THRESHOLDS
            .into_iter()
            .filter(|threshold| {
                self.max_percent >= i64::from(*threshold) && !self.reported.contains(threshold)
            })
            .collect();
        for threshold in &crossed {
            self.reported.push(*threshold);
            self.dispatcher.track_scroll_depth(*threshold)?;
        }
        Ok(crossed)
    }
}

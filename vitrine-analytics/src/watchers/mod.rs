//! Passive watchers that turn host notifications into events.
//!
//! The host forwards raw notifications (scroll offsets, clicked anchors,
//! uncaught errors, navigation timing) and each watcher decides whether an
//! event is recorded. Every watcher holds a [`Dispatcher`](crate::Dispatcher)
//! clone, so events follow the usual queueing and consent rules.

mod errors;
mod links;
mod page;
mod performance;
mod scroll;

pub use errors::{ErrorWatcher, ScriptError};
pub use links::{Anchor, LinkType, LinkWatcher, classify};
pub use page::{PageLoad, track_page_load};
pub use performance::{NavigationTiming, TimingSource, spawn_performance_report};
pub use scroll::{SCROLL_THRESHOLDS, ScrollDepthWatcher, ScrollPosition};

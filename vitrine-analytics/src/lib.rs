//! Analytics event dispatch for showcase sites.
//!
//! Events recorded before the reporting backend is available are queued in
//! call order. Once a [`Reporter`] is attached the queue is flushed and every
//! later event is forwarded immediately. Each forwarded event is enriched at
//! send time with the session duration, a timestamp, the user agent and the
//! viewport size.
//!
//! ```ignore
//! use vitrine_analytics::{Dispatcher, params};
//!
//! let analytics = Dispatcher::builder().build();
//! analytics.record("template_view", params! { "template_id" => "saas" })?;
//! analytics.attach(reporter)?; // flushes the queued event
//! ```
#![warn(missing_docs)]

pub mod consent;
pub mod dispatcher;
pub mod enrich;
pub mod error;
mod events;
pub mod reporter;
pub mod watchers;

pub use consent::{CONSENT_KEY, Consent, ConsentStore, MemoryConsentStore};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherConfig, QueuedEvent};
pub use enrich::{Environment, StaticEnvironment, Viewport};
pub use error::ReportError;
pub use reporter::{BackendProbe, EventParams, Reporter};

#[doc(hidden)]
pub use serde_json;

/// Builds an [`EventParams`] map from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so anything it accepts works.
#[macro_export]
macro_rules! params {
    () => { $crate::EventParams::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::EventParams::new();
        $( map.insert(::std::string::String::from($key), $crate::serde_json::json!($value)); )+
        map
    }};
}

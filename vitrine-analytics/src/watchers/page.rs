use crate::dispatcher::Dispatcher;
use crate::error::ReportError;
use crate::params;

/// Page facts reported once the backend is ready.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLoad {
    /// `loadEventEnd - navigationStart`, in milliseconds.
    pub load_time_ms: u64,
    /// Document title.
    pub title: String,
    /// Referrer URL; empty for direct visits.
    pub referrer: String,
}

/// Records `page_load_complete`.
pub fn track_page_load(dispatcher: &Dispatcher, page: &PageLoad) -> Result<(), ReportError> {
    let referrer = if page.referrer.is_empty() {
        "direct"
    } else {
        page.referrer.as_str()
    };
    dispatcher.record(
        "page_load_complete",
        params! {
            "load_time_ms" => page.load_time_ms,
            "page_title" => page.title.as_str(),
            "referrer" => referrer,
        },
    )
}

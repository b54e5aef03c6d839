use std::fmt;

use crate::dispatcher::Dispatcher;
use crate::error::ReportError;
use crate::params;

/// Kind of outbound link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// `mailto:` link.
    Email,
    /// `tel:` link.
    Phone,
    /// Absolute `http`/`https` link.
    External,
}

impl LinkType {
    /// Value of the `link_type` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Email => "email",
            LinkType::Phone => "phone",
            LinkType::External => "external",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an `href`; relative and fragment links are not outbound.
///
/// Schemes are matched case-insensitively.
pub fn classify(href: &str) -> Option<LinkType> {
    if has_scheme(href, "mailto:") {
        Some(LinkType::Email)
    } else if has_scheme(href, "tel:") {
        Some(LinkType::Phone)
    } else if has_scheme(href, "http://") || has_scheme(href, "https://") {
        Some(LinkType::External)
    } else {
        None
    }
}

fn has_scheme(href: &str, scheme: &str) -> bool {
    href.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}

/// The nearest anchor around a click target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor {
    /// Raw `href` attribute.
    pub href: Option<String>,
    /// Text content of the anchor.
    pub text: String,
}

impl Anchor {
    /// Creates an anchor with an `href`.
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            text: text.into(),
        }
    }
}

/// Records `external_link_click` for outbound links.
#[derive(Debug, Clone)]
pub struct LinkWatcher {
    dispatcher: Dispatcher,
}

impl LinkWatcher {
    /// Creates a watcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handles a click; `anchor` is `None` when no anchor encloses the target.
    ///
    /// Returns the link type when an event was recorded.
    pub fn on_click(&self, anchor: Option<&Anchor>) -> Result<Option<LinkType>, ReportError> {
        let Some((href, anchor)) = anchor.and_then(|a| a.href.as_deref().map(|href| (href, a)))
        else {
            return Ok(None);
        };
        let Some(link_type) = classify(href) else {
            return Ok(None);
        };

        self.dispatcher.record(
            "external_link_click",
            params! {
                "link_url" => href,
                "link_text" => anchor.text.trim(),
                "link_type" => link_type.as_str(),
                "event_category" => "engagement",
            },
        )?;
        Ok(Some(link_type))
    }
}

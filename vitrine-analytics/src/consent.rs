//! Analytics consent persistence.

use std::fmt;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Key under which the consent decision is stored.
pub const CONSENT_KEY: &str = "analytics_consent";

/// A recorded consent decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consent {
    /// The user accepted analytics.
    Accepted,
    /// The user declined analytics.
    Declined,
}

impl Consent {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Consent::Accepted => "accepted",
            Consent::Declined => "declined",
        }
    }

    /// Parses a stored value; anything unrecognized means "not decided".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(Consent::Accepted),
            "declined" => Some(Consent::Declined),
            _ => None,
        }
    }
}

impl fmt::Display for Consent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key-value storage that survives page loads.
pub trait ConsentStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str);
}

/// Process-local [`ConsentStore`].
#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    values: DashMap<String, String>,
}

impl MemoryConsentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding an earlier decision.
    pub fn with_consent(consent: Consent) -> Self {
        let store = Self::new();
        store.set(CONSENT_KEY, consent.as_str());
        store
    }
}

impl ConsentStore for MemoryConsentStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| value.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_stored_value_is_undecided() {
        let store = MemoryConsentStore::new();
        store.set(CONSENT_KEY, "maybe");
        assert_eq!(store.get(CONSENT_KEY).as_deref().and_then(Consent::parse), None);
        assert_eq!(Consent::parse("accepted"), Some(Consent::Accepted));
    }
}

//! Cached value types with age metadata.
//!
//! A [`CacheValue`] wraps stored data with the instant it was written and,
//! optionally, the instant it stops being usable. Partitions use the write
//! instant for FIFO ordering and the expiry instant for lookups.
//!
//! Instants come from [`tokio::time::Instant`], so tests running on a paused
//! clock can advance time deterministically.

use std::time::Duration;

use tokio::time::Instant;

use crate::response::CacheState;

/// A cached value with age metadata.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use vitrine_core::CacheValue;
///
/// let value = CacheValue::fresh("body", Some(Duration::from_secs(60)));
/// assert_eq!(value.data(), &"body");
/// assert!(value.ttl().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue<T> {
    data: T,
    stored_at: Instant,
    expire: Option<Instant>,
}

impl<T> CacheValue<T> {
    /// Creates a new cache value with explicit timestamps.
    pub fn new(data: T, stored_at: Instant, expire: Option<Instant>) -> Self {
        CacheValue {
            data,
            stored_at,
            expire,
        }
    }

    /// Creates a value stored now that expires after `max_age`, if any.
    pub fn fresh(data: T, max_age: Option<Duration>) -> Self {
        let now = Instant::now();
        CacheValue {
            data,
            stored_at: now,
            expire: max_age.map(|age| now + age),
        }
    }

    /// Returns a reference to the cached data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns when the data was written.
    #[inline]
    pub fn stored_at(&self) -> Instant {
        self.stored_at
    }

    /// Returns when the data expires.
    #[inline]
    pub fn expire(&self) -> Option<Instant> {
        self.expire
    }

    /// Consumes the cache value and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Time left before expiry, or `None` if there is no expiry or it has passed.
    pub fn ttl(&self) -> Option<Duration> {
        self.expire
            .and_then(|expire| expire.checked_duration_since(Instant::now()))
    }

    /// Returns `true` once the value is older than its maximum age.
    ///
    /// A value whose age equals the maximum age is still usable.
    pub fn is_expired(&self) -> bool {
        self.expire.is_some_and(|expire| expire < Instant::now())
    }

    /// Check the cache state based on the expiry timestamp.
    pub fn cache_state(self) -> CacheState<Self> {
        if self.is_expired() {
            CacheState::Expired(self)
        } else {
            CacheState::Actual(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_max_age() {
        let value = CacheValue::fresh(1u8, Some(Duration::from_secs(10)));
        assert!(!value.is_expired());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!value.is_expired(), "age equal to max age is still fresh");
        assert_eq!(value.ttl(), Some(Duration::ZERO));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(value.is_expired());
        assert!(value.ttl().is_none());
        assert!(matches!(value.cache_state(), CacheState::Expired(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_max_age_never_expires() {
        let value = CacheValue::fresh("x", None);
        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;
        assert!(matches!(value.cache_state(), CacheState::Actual(_)));
    }
}

//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with optional expiration.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiration.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// A zero `ttl` means the entry never expires.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: expires_at(ttl),
        }
    }

    /// Creates a new cache entry without expiration.
    pub fn persistent(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is considered expired when the current time is greater than or
    /// equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`CacheEntry::is_expired`] against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining time to live, or None if no expiration is set.
    ///
    /// Returns `Some(Duration::ZERO)` once the entry has expired.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Utility Functions ==
/// Converts a TTL into an absolute expiration instant; zero means none.
pub fn expires_at(ttl: Duration) -> Option<Instant> {
    if ttl.is_zero() {
        return None;
    }
    // An overflowing deadline is as good as never.
    Instant::now().checked_add(ttl)
}

/// Converts a TTL in whole seconds into a `Duration`.
///
/// Zero and negative values map to `Duration::ZERO` (no expiration).
pub fn ttl_from_secs(ttl_secs: i64) -> Duration {
    if ttl_secs <= 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(ttl_secs as u64)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = CacheEntry::new("test_value", Duration::ZERO);

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_persistent() {
        let entry = CacheEntry::persistent(7u32);
        assert!(entry.expires_at.is_none());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Duration::from_millis(100));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(150));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(1, Duration::from_secs(10));

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new(1, Duration::from_millis(20));

        sleep(Duration::from_millis(50));

        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            value: "test",
            expires_at: Some(now),
        };

        // Expired when current time >= expires_at
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - Duration::from_millis(1)));
    }

    #[test]
    fn test_ttl_from_secs() {
        assert_eq!(ttl_from_secs(0), Duration::ZERO);
        assert_eq!(ttl_from_secs(-5), Duration::ZERO);
        assert_eq!(ttl_from_secs(3), Duration::from_secs(3));
    }

    #[test]
    fn test_expires_at_zero_is_none() {
        assert!(expires_at(Duration::ZERO).is_none());
        assert!(expires_at(Duration::MAX).is_none());
        assert!(expires_at(Duration::from_secs(1)).is_some());
    }
}

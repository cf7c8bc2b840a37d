//! Individual cache entries with TTL support
//!
//! A `CacheEntry` holds a payload together with its creation instant and a
//! time-to-live. Expiry is evaluated lazily whenever the entry is read;
//! nothing in this module spawns timers or mutates an entry after creation.

use std::time::{Duration, Instant};

/// A single cached value stamped with its creation time and TTL
///
/// Entries are immutable after construction. Replacing a value means storing
/// a new entry with a fresh timestamp; there is no in-place refresh. Because
/// nothing is ever mutated, an entry can be read from multiple callers
/// without synchronization.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload, owned by the entry once stored
    payload: T,
    /// Monotonic creation timestamp
    created_at: Instant,
    /// How long after creation the payload is considered fresh
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stamped with the current instant
    ///
    /// A `ttl` of zero is valid and means "expired immediately after
    /// creation", which is useful to force a deterministic miss in tests.
    /// Negative TTLs are unrepresentable (`Duration` is unsigned).
    pub fn new(payload: T, ttl: Duration) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
            ttl,
        }
    }

    /// Returns whether the entry's TTL has elapsed
    ///
    /// The boundary at exactly TTL counts as expired, so a zero-TTL entry is
    /// expired from the moment it is created.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= self.ttl
    }

    /// Returns the payload together with its expiry flag computed at call time
    ///
    /// Expiry is informational here; removing expired entries is the store's
    /// job, so reading an expired entry is not an error.
    pub fn value(&self) -> (&T, bool) {
        (&self.payload, self.is_expired())
    }

    /// Monotonic instant at which the entry was created
    pub fn created_at(&self) -> Instant {
        self.created_at
    }
}

//! Rate-limit state storage.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::ClassLimits;

/// Counter state for one (class, client) key.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitEntry {
    /// Points left in the current window.
    pub remaining: u32,
    /// Instant the current window ends and points replenish.
    pub window_ends_at: DateTime<Utc>,
    /// Set once the key is blocked; all consumes fail until then.
    pub blocked_until: Option<DateTime<Utc>>,
}

impl RateLimitEntry {
    fn fresh(limits: &ClassLimits, now: DateTime<Utc>) -> Self {
        Self {
            remaining: limits.points,
            window_ends_at: now + Duration::seconds(limits.window_secs as i64),
            blocked_until: None,
        }
    }
}

/// Successful consumption.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub limit: u32,
    pub remaining: u32,
    pub resets_at: DateTime<Utc>,
}

/// Rejected consumption; carries retry timing for the caller.
#[derive(Debug, Clone)]
pub struct RateLimitExceeded {
    pub limit: u32,
    pub resets_at: DateTime<Utc>,
}

impl RateLimitExceeded {
    /// Whole seconds until the key admits requests again, rounded up.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.resets_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000)
    }
}

/// Keyed storage for rate-limit counters.
pub trait RateLimitStore: Send + Sync {
    /// Current state of a key, if one exists.
    fn get(&self, key: &str) -> Option<RateLimitEntry>;

    /// Atomically decrement-and-check one point for `key`.
    fn consume(
        &self,
        key: &str,
        limits: &ClassLimits,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, RateLimitExceeded>;

    /// Drop all state for a key, restoring full capacity.
    fn reset(&self, key: &str);
}

/// In-memory store. Per-entry locking in the map makes the
/// decrement-and-check step atomic; distinct keys never contend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|e| e.clone())
    }

    fn consume(
        &self,
        key: &str,
        limits: &ClassLimits,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, RateLimitExceeded> {
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimitEntry::fresh(limits, now));

        if let Some(until) = entry.blocked_until {
            if now < until {
                return Err(RateLimitExceeded {
                    limit: limits.points,
                    resets_at: until,
                });
            }
            *entry = RateLimitEntry::fresh(limits, now);
        }

        if now >= entry.window_ends_at {
            *entry = RateLimitEntry::fresh(limits, now);
        }

        if entry.remaining > 0 {
            entry.remaining -= 1;
            return Ok(RateLimitDecision {
                limit: limits.points,
                remaining: entry.remaining,
                resets_at: entry.window_ends_at,
            });
        }

        // Exhausted. A configured block period starts on the first rejected
        // attempt; otherwise the caller waits out the window.
        let resets_at = if limits.block_secs > 0 {
            let until = now + Duration::seconds(limits.block_secs as i64);
            entry.blocked_until = Some(until);
            until
        } else {
            entry.window_ends_at
        };

        Err(RateLimitExceeded {
            limit: limits.points,
            resets_at,
        })
    }

    fn reset(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(points: u32, window_secs: u64, block_secs: u64) -> ClassLimits {
        ClassLimits {
            points,
            window_secs,
            block_secs,
        }
    }

    #[test]
    fn consumes_down_to_zero_then_rejects() {
        let store = MemoryStore::new();
        let limits = limits(3, 60, 0);
        let now = Utc::now();

        for expected_remaining in [2, 1, 0] {
            let decision = store.consume("api:1-2-3-4", &limits, now).unwrap();
            assert_eq!(decision.remaining, expected_remaining);
            assert_eq!(decision.limit, 3);
        }

        let rejected = store.consume("api:1-2-3-4", &limits, now).unwrap_err();
        assert_eq!(rejected.resets_at, now + Duration::seconds(60));
    }

    #[test]
    fn window_expiry_restores_full_capacity() {
        let store = MemoryStore::new();
        let limits = limits(2, 60, 0);
        let now = Utc::now();

        store.consume("k", &limits, now).unwrap();
        store.consume("k", &limits, now).unwrap();
        assert!(store.consume("k", &limits, now).is_err());

        let later = now + Duration::seconds(61);
        let decision = store.consume("k", &limits, later).unwrap();
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn block_starts_on_first_rejected_attempt() {
        let store = MemoryStore::new();
        let limits = limits(1, 60, 600);
        let now = Utc::now();

        store.consume("k", &limits, now).unwrap();
        let rejected = store.consume("k", &limits, now).unwrap_err();
        assert_eq!(rejected.resets_at, now + Duration::seconds(600));

        // Still blocked after the window would have expired.
        let after_window = now + Duration::seconds(120);
        let rejected = store.consume("k", &limits, after_window).unwrap_err();
        assert_eq!(rejected.resets_at, now + Duration::seconds(600));

        // Block expiry restores full capacity.
        let after_block = now + Duration::seconds(601);
        let decision = store.consume("k", &limits, after_block).unwrap();
        assert_eq!(decision.remaining, 0);
    }

    #[test]
    fn blocked_attempts_do_not_extend_the_block() {
        let store = MemoryStore::new();
        let limits = limits(1, 60, 600);
        let now = Utc::now();

        store.consume("k", &limits, now).unwrap();
        let first = store.consume("k", &limits, now).unwrap_err();
        let second = store
            .consume("k", &limits, now + Duration::seconds(30))
            .unwrap_err();
        assert_eq!(first.resets_at, second.resets_at);
    }

    #[test]
    fn keys_are_independent() {
        let store = MemoryStore::new();
        let limits = limits(1, 60, 0);
        let now = Utc::now();

        store.consume("search:a", &limits, now).unwrap();
        assert!(store.consume("search:a", &limits, now).is_err());
        assert!(store.consume("search:b", &limits, now).is_ok());
    }

    #[test]
    fn reset_restores_capacity() {
        let store = MemoryStore::new();
        let limits = limits(1, 60, 600);
        let now = Utc::now();

        store.consume("k", &limits, now).unwrap();
        assert!(store.consume("k", &limits, now).is_err());

        store.reset("k");
        assert!(store.consume("k", &limits, now).is_ok());
    }

    #[test]
    fn retry_after_rounds_up() {
        let now = Utc::now();
        let exceeded = RateLimitExceeded {
            limit: 1,
            resets_at: now + Duration::milliseconds(1500),
        };
        assert_eq!(exceeded.retry_after_secs(now), 2);
        assert_eq!(exceeded.retry_after_secs(now + Duration::seconds(10)), 0);
    }
}

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;

use crate::RateLimiter;

/// Two-phase per-item backoff.
///
/// An item's first `max_fast_attempts` retries wait `fast`; every retry
/// after that waits `slow`. Suits queues where a couple of quick retries
/// clear transient failures and anything still failing should settle into a
/// long poll.
#[derive(Debug)]
pub struct FastSlowBackoff<K: Hash + Eq> {
    fast: Duration,
    slow: Duration,
    max_fast_attempts: u32,
    attempts: DashMap<K, u32>,
}

impl<K: Hash + Eq> FastSlowBackoff<K> {
    pub fn new(fast: Duration, slow: Duration, max_fast_attempts: u32) -> Self {
        Self {
            fast,
            slow,
            max_fast_attempts,
            attempts: DashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone + Debug> RateLimiter<K> for FastSlowBackoff<K> {
    fn when(&self, item: &K) -> Duration {
        let attempt = {
            let mut entry = self.attempts.entry(item.clone()).or_insert(0);
            *entry += 1;
            *entry
        };

        if attempt <= self.max_fast_attempts {
            self.fast
        } else {
            self.slow
        }
    }

    fn forget(&self, item: &K) {
        self.attempts.remove(item);
    }

    fn requeues(&self, item: &K) -> u32 {
        self.attempts.get(item).map(|entry| *entry.value()).unwrap_or(0)
    }
}

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;

use crate::RateLimiter;

/// Per-item exponential backoff.
///
/// Each failure doubles the item's delay, starting at `base` and clamping at
/// `max`. Items are tracked independently; the queue calls
/// [`RateLimiter::forget`] once an item succeeds so its next failure starts
/// over at `base`.
#[derive(Debug)]
pub struct ExponentialBackoff<K: Hash + Eq> {
    base: Duration,
    max: Duration,
    failures: DashMap<K, u32>,
}

impl<K: Hash + Eq> ExponentialBackoff<K> {
    /// Creates a backoff ramping from `base` up to `max` per item.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            failures: DashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone + Debug> RateLimiter<K> for ExponentialBackoff<K> {
    fn when(&self, item: &K) -> Duration {
        let exp = {
            let mut entry = self.failures.entry(item.clone()).or_insert(0);
            let seen = *entry;
            *entry += 1;
            seen
        };

        // The doubling saturates once it outruns the representation.
        let base_ns = self.base.as_nanos();
        let delay_ns = if exp >= base_ns.leading_zeros() {
            u128::MAX
        } else {
            base_ns << exp
        };

        if delay_ns >= self.max.as_nanos() {
            self.max
        } else {
            Duration::from_nanos(delay_ns as u64)
        }
    }

    fn forget(&self, item: &K) {
        self.failures.remove(item);
    }

    fn requeues(&self, item: &K) -> u32 {
        self.failures.get(item).map(|entry| *entry.value()).unwrap_or(0)
    }
}

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use quanta::Clock;
use quanta::Instant;

use crate::ConfigError;
use crate::RateLimiter;

/// A debt-carrying token bucket shared by every item in the queue.
///
/// The bucket starts full: the first `capacity` calls return a zero wait,
/// and each call past that is scheduled one refill interval after the
/// previous one. Consumption is never refused; the schedule simply runs
/// ahead of real time and [`RateLimiter::when`] reports the gap. Refill is
/// continuous and capped at `capacity`, so idle time cannot bank an
/// oversized burst, while committed debt is repaid only by real elapsed
/// time.
///
/// The `{stored_tokens, last_update}` pair collapses into one virtual
/// schedule clock: `next_slot` is the start of the next reservation,
/// measured in nanoseconds from `anchor` and offset by the burst headroom.
/// A single CAS advances it, so concurrent callers each claim a distinct
/// slot.
#[derive(Debug)]
pub struct BucketLimiter {
    /// Start of the next reservation, nanos from `anchor`.
    next_slot: AtomicU64,
    /// Time to mint one token: `period / quantum`.
    interval_ns: u64,
    /// Headroom granted by the burst: `(capacity - 1) * interval`.
    burst_ns: u64,
    clock: Clock,
    /// A fixed point in time to calculate deltas from.
    anchor: Instant,
}

impl BucketLimiter {
    /// Creates a bucket holding at most `capacity` tokens, refilled at
    /// `quantum` tokens per `period`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` or `quantum` is not positive,
    /// if `period` is zero, or if the refill rate exceeds one token per
    /// nanosecond.
    pub fn new(capacity: i64, quantum: i64, period: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(capacity, quantum, period, Clock::new())
    }

    /// Same as [`BucketLimiter::new`], reading time from a caller-supplied
    /// clock source.
    pub fn with_clock(
        capacity: i64,
        quantum: i64,
        period: Duration,
        clock: Clock,
    ) -> Result<Self, ConfigError> {
        if capacity <= 0 {
            return Err(ConfigError::Capacity(capacity));
        }
        if quantum <= 0 {
            return Err(ConfigError::PeriodTokens(quantum));
        }
        if period.is_zero() {
            return Err(ConfigError::Period(period));
        }

        let period_ns = period.as_nanos() as u64;
        if quantum as u64 > period_ns {
            return Err(ConfigError::RefillRate(quantum as f64 / period_ns as f64));
        }

        let interval_ns = period_ns / quantum as u64;
        let anchor = clock.now();

        Ok(Self {
            next_slot: AtomicU64::new(0),
            interval_ns,
            burst_ns: (capacity as u64 - 1).saturating_mul(interval_ns),
            clock,
            anchor,
        })
    }
}

impl<K> RateLimiter<K> for BucketLimiter {
    fn when(&self, _item: &K) -> Duration {
        let now = self.clock.now().duration_since(self.anchor).as_nanos() as u64;

        loop {
            let slot = self.next_slot.load(Ordering::Acquire);

            // An idle schedule never trails real time; that is the capacity
            // cap on stored tokens.
            let next = slot.max(now).saturating_add(self.interval_ns);

            if self
                .next_slot
                .compare_exchange_weak(slot, next, Ordering::Release, Ordering::Relaxed)
                .is_ok()
            {
                // Slots inside the burst headroom saturate to a zero wait.
                return Duration::from_nanos(
                    slot.saturating_sub(now.saturating_add(self.burst_ns)),
                );
            }
        }
    }

    fn forget(&self, _item: &K) {
        // One shared bucket; there is no per-item history to drop.
    }

    fn requeues(&self, _item: &K) -> u32 {
        0
    }
}

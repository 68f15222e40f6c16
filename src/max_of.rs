use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::BucketLimiter;
use crate::ConfigError;
use crate::ExponentialBackoff;
use crate::RateLimiter;

/// Combines several strategies and always honors the strictest one.
///
/// Every inner limiter is charged on every call, so their schedules advance
/// together; the answer is the longest of the inner delays.
#[derive(Debug)]
pub struct MaxOf<K> {
    limiters: Vec<Box<dyn RateLimiter<K> + Send + Sync>>,
}

impl<K> MaxOf<K> {
    pub fn new(limiters: Vec<Box<dyn RateLimiter<K> + Send + Sync>>) -> Self {
        Self { limiters }
    }
}

impl<K> MaxOf<K>
where
    K: Hash + Eq + Clone + Debug + Send + Sync + 'static,
{
    /// The stock work-queue pacing: per-item exponential backoff for the
    /// failing few, overall bucket pacing for everyone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the bucket half rejects its configuration.
    pub fn default_pacer() -> Result<Self, ConfigError> {
        let per_item =
            ExponentialBackoff::new(Duration::from_millis(5), Duration::from_secs(1000));
        let overall = BucketLimiter::new(100, 10, Duration::from_secs(1))?;

        Ok(Self::new(vec![Box::new(per_item), Box::new(overall)]))
    }
}

impl<K: Debug> RateLimiter<K> for MaxOf<K> {
    fn when(&self, item: &K) -> Duration {
        // Every inner limiter gets charged, not just the winner.
        self.limiters
            .iter()
            .map(|limiter| limiter.when(item))
            .max()
            .unwrap_or(Duration::ZERO)
    }

    fn forget(&self, item: &K) {
        for limiter in &self.limiters {
            limiter.forget(item);
        }
    }

    fn requeues(&self, item: &K) -> u32 {
        self.limiters
            .iter()
            .map(|limiter| limiter.requeues(item))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use crate::FastSlowBackoff;

    use super::*;

    #[test]
    fn answers_with_the_strictest_delay() {
        let pacer: MaxOf<&str> = MaxOf::new(vec![
            Box::new(ExponentialBackoff::new(
                Duration::from_millis(1),
                Duration::from_secs(1000),
            )),
            Box::new(FastSlowBackoff::new(
                Duration::from_millis(5),
                Duration::from_secs(3),
                3,
            )),
        ]);

        // Fast phase outweighs the young exponential ramp, then the slow
        // phase takes over.
        assert_eq!(pacer.when(&"one"), Duration::from_millis(5));
        assert_eq!(pacer.when(&"one"), Duration::from_millis(5));
        assert_eq!(pacer.when(&"one"), Duration::from_millis(5));
        assert_eq!(pacer.when(&"one"), Duration::from_secs(3));
    }

    #[test]
    fn every_inner_limiter_is_charged() {
        let pacer: MaxOf<&str> = MaxOf::new(vec![
            Box::new(ExponentialBackoff::new(
                Duration::from_millis(1),
                Duration::from_secs(1000),
            )),
            Box::new(FastSlowBackoff::new(
                Duration::from_millis(5),
                Duration::from_secs(3),
                1,
            )),
        ]);

        pacer.when(&"x");
        pacer.when(&"x");
        assert_eq!(pacer.requeues(&"x"), 2);

        pacer.forget(&"x");
        assert_eq!(pacer.requeues(&"x"), 0);

        // Both halves restarted: young ramp and fresh fast phase.
        assert_eq!(pacer.when(&"x"), Duration::from_millis(5));
    }

    #[test]
    fn empty_combinator_is_free() {
        let pacer: MaxOf<u32> = MaxOf::new(Vec::new());

        assert_eq!(pacer.when(&7), Duration::ZERO);
        assert_eq!(pacer.requeues(&7), 0);
    }

    #[test]
    fn default_pacer_bursts_then_backs_off() {
        let pacer: MaxOf<&str> = MaxOf::default_pacer().unwrap();

        // The bucket's 100-slot burst leaves the exponential half in charge.
        assert_eq!(pacer.when(&"one"), Duration::from_millis(5));
        assert_eq!(pacer.when(&"one"), Duration::from_millis(10));
        assert_eq!(pacer.when(&"one"), Duration::from_millis(20));
        assert_eq!(pacer.requeues(&"one"), 3);

        pacer.forget(&"one");
        assert_eq!(pacer.when(&"one"), Duration::from_millis(5));
    }
}

//! # requeue-limit
//!
//! `requeue-limit` provides retry pacing strategies for work-queue clients.
//!
//! ## Core Philosophy
//!
//! A work queue retries failed items. Retrying immediately hammers whatever
//! just failed, and parking a worker thread inside the limiter wastes it.
//! Every strategy here instead answers the question "how long should this
//! item wait before it is retried" and returns at once: the caller
//! re-enqueues the item after the returned delay. State transitions use
//! atomic primitives and Compare-And-Swap (CAS) loops, so [`RateLimiter::when`]
//! stays non-blocking no matter how many workers call it.
//!
//! ## Key Concepts
//!
//! * **Advisory Pacing**: [`RateLimiter::when`] never refuses a call and
//!   never sleeps. It commits a reservation and tells the caller how long to
//!   honor it.
//! * **Shared vs Keyed**: [`BucketLimiter`] paces one shared resource and
//!   ignores the item key; [`ExponentialBackoff`] and [`FastSlowBackoff`]
//!   track each item separately; [`MaxOf`] combines both kinds.
//! * **Fail at Construction**: a limiter either validates its configuration
//!   up front and works forever, or is never built. See [`ConfigError`].
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use requeue_limit::BucketLimiter;
//! use requeue_limit::RateLimiter;
//!
//! let pacer = BucketLimiter::new(10, 5, Duration::from_secs(1)).unwrap();
//!
//! // A failed item asks how long to stay parked before its retry.
//! let delay = pacer.when(&"deploy/frontend");
//! assert_eq!(delay, Duration::ZERO);
//! ```

use std::fmt::Debug;
use std::time::Duration;

mod bucket;
mod error;
mod exponential;
mod fast_slow;
mod max_of;

pub use bucket::BucketLimiter;
pub use error::ConfigError;
pub use exponential::ExponentialBackoff;
pub use fast_slow::FastSlowBackoff;
pub use max_of::MaxOf;

/// The core trait for retry pacing strategies.
///
/// `K` identifies a work item. Keyed strategies keep history per item;
/// unkeyed strategies accept the key only to satisfy the contract.
///
/// Strategies must be `Send` and `Sync` to allow sharing across worker
/// threads via `Arc`.
pub trait RateLimiter<K>: Debug {
    /// Returns how long `item` should wait before its next retry.
    ///
    /// This method is non-blocking and total: every call commits a
    /// reservation and succeeds, even when the schedule is deep in debt.
    fn when(&self, item: &K) -> Duration;

    /// Drops any pacing history held for `item`.
    ///
    /// The queue calls this once an item finally succeeds. Strategies
    /// without per-item state do nothing.
    fn forget(&self, item: &K);

    /// Number of times `item` has been paced since it was last forgotten.
    fn requeues(&self, item: &K) -> u32;
}

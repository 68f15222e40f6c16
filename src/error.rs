use std::time::Duration;

/// Errors produced when a limiter configuration is rejected.
///
/// Raised only during construction. A limiter that exists is always valid;
/// its [`when`](crate::RateLimiter::when) cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The maximum burst size must be positive.
    #[error("capacity must be positive, got {0}")]
    Capacity(i64),

    /// The number of tokens granted per refill period must be positive.
    #[error("period tokens must be positive, got {0}")]
    PeriodTokens(i64),

    /// The refill period must be positive.
    #[error("period must be positive, got {0:?}")]
    Period(Duration),

    /// The refill rate is capped so that waits stay representable in
    /// nanoseconds.
    #[error("refill rate of {0} tokens/ns exceeds the highest supported rate of 1 token/nanosecond")]
    RefillRate(f64),
}

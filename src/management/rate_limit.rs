use std::{num::NonZeroU32, time::Duration};

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

/// Request budget per client key, backed by a keyed GCRA limiter.
///
/// A fresh key may spend `limit` requests at once; the budget then refills
/// evenly over `window`. Keys are caller supplied (a forwarded address, say),
/// so [`ClientLimiter::purge`] must run periodically to forget idle ones.
pub struct ClientLimiter {
    inner: DefaultKeyedRateLimiter<String>,
}

impl ClientLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        ClientLimiter {
            inner: RateLimiter::keyed(quota(limit, window)),
        }
    }

    /// Spends one request of `key`'s budget.
    ///
    /// # Returns
    ///
    /// `false` when the budget is exhausted; nothing is spent in that case.
    pub fn check(&self, key: &str) -> bool {
        self.inner.check_key(&key.to_string()).is_ok()
    }

    /// Forgets every key whose budget has fully refilled and returns the
    /// number of keys still tracked.
    pub fn purge(&self) -> usize {
        self.inner.retain_recent();
        self.inner.shrink_to_fit();
        self.inner.len()
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// `limit` requests per `window`, with the whole `limit` available as burst.
///
/// A zero `limit` is treated as one.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use moodmix::management::quota;
///
/// let per_minute = quota(50, Duration::from_secs(60));
/// assert_eq!(per_minute.burst_size().get(), 50);
/// ```
pub fn quota(limit: u32, window: Duration) -> Quota {
    let burst = NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN);
    Quota::with_period(window / burst.get())
        .unwrap_or_else(|| Quota::per_minute(burst))
        .allow_burst(burst)
}

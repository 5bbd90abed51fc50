use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Rate limiter for outbound ClickUp requests
///
/// The burst equals the per-minute budget so a full minute's worth of
/// requests may go out at once; capacity then replenishes evenly.
#[derive(Clone)]
pub struct ClickUpRateLimiter {
    inner: Arc<DefaultDirectRateLimiter>,
}

impl ClickUpRateLimiter {
    /// Limiter allowing `requests_per_minute` sustained requests (minimum 1)
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let budget = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            inner: Arc::new(RateLimiter::direct(Quota::per_minute(budget))),
        }
    }

    /// Wait until the budget allows another request
    pub async fn acquire(&self) {
        if self.inner.check().is_err() {
            tracing::debug!("rate limiter waiting for capacity");
            self.inner.until_ready().await;
        }
    }
}

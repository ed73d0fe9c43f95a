//! Health indicator contract
//!
//! An indicator is a named unit of work that reports exactly one [`Health`]
//! per check through a [`HealthIndicatorCallback`].

use super::caching::CachingHealthIndicator;
use super::types::Health;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Single-use sink for an indicator's result
///
/// `inform` consumes the callback, so a result can be reported at most once.
/// Dropping it without informing leaves the indicator outstanding until the
/// aggregator's deadline.
pub struct HealthIndicatorCallback {
    inform: Box<dyn FnOnce(Health) + Send + 'static>,
}

impl HealthIndicatorCallback {
    /// Wrap a closure receiving the reported result
    pub fn new<F>(inform: F) -> Self
    where
        F: FnOnce(Health) + Send + 'static,
    {
        Self {
            inform: Box::new(inform),
        }
    }

    /// Callback paired with a receiver for the reported result
    pub fn channel() -> (Self, oneshot::Receiver<Health>) {
        let (sender, receiver) = oneshot::channel();
        let callback = Self::new(move |health| {
            // The receiver is gone once the aggregator has finalized
            let _ = sender.send(health);
        });
        (callback, receiver)
    }

    /// Report the result
    pub fn inform(self, health: Health) {
        (self.inform)(health)
    }
}

impl fmt::Debug for HealthIndicatorCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthIndicatorCallback").finish_non_exhaustive()
    }
}

/// A named health check
///
/// Implementations run inside a task owned by the aggregator, which applies
/// the deadline and cancellation. They must call `inform` once and must not
/// spawn background work they do not own. Returning `Err` is equivalent to
/// informing an unhealthy result carrying the error under `error`.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    /// Stable name used for reporting and filtering
    fn name(&self) -> &str;

    /// Run the check and report through `callback`
    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()>;
}

/// Factory functions for common indicators
pub struct HealthIndicators;

impl HealthIndicators {
    /// Indicator that always reports healthy
    pub fn always_healthy(name: impl Into<String>) -> Arc<dyn HealthIndicator> {
        Self::memoize(name, Health::healthy().build())
    }

    /// Indicator that always reports unhealthy
    pub fn always_unhealthy(name: impl Into<String>) -> Arc<dyn HealthIndicator> {
        Self::memoize(name, Health::unhealthy_with("Unhealthy"))
    }

    /// Indicator that always reports `health`
    pub fn memoize(name: impl Into<String>, health: Health) -> Arc<dyn HealthIndicator> {
        Arc::new(MemoizedIndicator {
            name: name.into(),
            health,
        })
    }

    /// Serve `delegate`'s result from a cache for `interval`
    pub fn cache(delegate: Arc<dyn HealthIndicator>, interval: Duration) -> Arc<dyn HealthIndicator> {
        Arc::new(CachingHealthIndicator::wrap(delegate, interval))
    }
}

struct MemoizedIndicator {
    name: String,
    health: Health,
}

#[async_trait]
impl HealthIndicator for MemoizedIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()> {
        callback.inform(self.health.clone());
        Ok(())
    }
}

//! Time-windowed caching for expensive indicators
//!
//! Results are served from the cache while the window is open. Once it
//! closes, exactly one caller refreshes; concurrent callers get the previous
//! (possibly stale) result instead of waiting. The next window is reserved
//! when the refresh starts, so a delegate that fails or never reports is
//! still invoked at most once per interval.

use super::indicator::{HealthIndicator, HealthIndicatorCallback};
use super::types::{CACHE_KEY, Health};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Indicator decorator caching the delegate's result for a fixed interval
pub struct CachingHealthIndicator {
    delegate: Arc<dyn HealthIndicator>,
    interval: Duration,
    entry: Arc<Mutex<CacheEntry>>,
}

#[derive(Debug, Default)]
struct CacheEntry {
    expires_at: Option<Instant>,
    health: Option<Health>,
    refreshing: bool,
}

enum Lookup {
    Fresh(Health),
    Stale(Option<Health>),
    Refresh(RefreshGuard),
}

/// Held by the single refresher; releases the reservation when dropped,
/// including when the delegate is cancelled or never informs.
struct RefreshGuard {
    entry: Arc<Mutex<CacheEntry>>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.entry.lock().refreshing = false;
    }
}

impl CachingHealthIndicator {
    /// Wrap `delegate`, caching its results for `interval`
    pub fn wrap(delegate: Arc<dyn HealthIndicator>, interval: Duration) -> Self {
        Self {
            delegate,
            interval,
            entry: Arc::new(Mutex::new(CacheEntry::default())),
        }
    }

    /// The wrapped indicator
    pub fn delegate(&self) -> &Arc<dyn HealthIndicator> {
        &self.delegate
    }

    /// Length of the cache window
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn lookup(&self, now: Instant) -> Lookup {
        let mut entry = self.entry.lock();
        if let Some(expires_at) = entry.expires_at {
            if now <= expires_at {
                return match entry.health.as_ref() {
                    Some(health) => Lookup::Fresh(health.clone()),
                    None => Lookup::Stale(None),
                };
            }
        }
        if entry.refreshing {
            return Lookup::Stale(entry.health.clone());
        }
        entry.refreshing = true;
        entry.expires_at = Some(now + self.interval);
        Lookup::Refresh(RefreshGuard {
            entry: self.entry.clone(),
        })
    }
}

fn mark_cached(health: &Health) -> Health {
    health
        .to_builder()
        .with_reserved(CACHE_KEY, Value::Bool(true))
        .build()
}

#[async_trait]
impl HealthIndicator for CachingHealthIndicator {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()> {
        match self.lookup(Instant::now()) {
            Lookup::Fresh(health) => {
                callback.inform(mark_cached(&health));
                Ok(())
            }
            Lookup::Stale(health) => {
                debug!(
                    indicator = self.name(),
                    "Refresh in flight, serving previous result"
                );
                let health = health.unwrap_or_else(|| Health::unhealthy().build());
                callback.inform(mark_cached(&health));
                Ok(())
            }
            Lookup::Refresh(guard) => {
                debug!(indicator = self.name(), "Cache expired, invoking delegate");
                let entry = self.entry.clone();
                let informed = Arc::new(AtomicBool::new(false));
                let reported = informed.clone();
                let caching = HealthIndicatorCallback::new(move |health: Health| {
                    reported.store(true, Ordering::Release);
                    entry.lock().health = Some(health.clone());
                    drop(guard);
                    callback.inform(health);
                });
                let result = self.delegate.check(caching).await;
                if let Err(error) = &result {
                    if !informed.load(Ordering::Acquire) {
                        self.entry.lock().health = Some(Health::unhealthy_with(error));
                    }
                }
                result
            }
        }
    }
}

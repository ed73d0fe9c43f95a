//! Health check aggregation
//!
//! Fans out to every registered indicator on its own task, collects the
//! reports until all have arrived or the deadline fires, and folds them into
//! one [`HealthCheckStatus`].

use super::caching::CachingHealthIndicator;
use super::indicator::{HealthIndicator, HealthIndicatorCallback};
use super::matcher::{IndicatorFilter, IndicatorMatcher};
use super::notifier::{EventDispatcher, StatusChangeNotifier};
use super::registry::HealthIndicatorRegistry;
use super::types::{Health, HealthCheckStatus, NAME_KEY};
use crate::monitoring::metrics::{CheckOutcome, HealthMetrics};
use crate::utils::error::{HealthError, Result};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::{AbortHandle, JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default time to wait for indicators before reporting them as timed out
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(1000);

/// Computes the aggregate health of a fixed set of indicators
pub struct HealthCheckAggregator {
    indicators: Vec<Arc<dyn HealthIndicator>>,
    max_wait: Option<Duration>,
    notifier: StatusChangeNotifier,
    metrics: Option<HealthMetrics>,
}

impl HealthCheckAggregator {
    pub fn builder() -> HealthCheckAggregatorBuilder {
        HealthCheckAggregatorBuilder::default()
    }

    /// Aggregator over `indicators` waiting at most `max_wait` (zero waits forever)
    pub fn new(indicators: Vec<Arc<dyn HealthIndicator>>, max_wait: Duration) -> Self {
        Self::builder().indicators(indicators).max_wait(max_wait).build()
    }

    pub fn indicators(&self) -> &[Arc<dyn HealthIndicator>] {
        &self.indicators
    }

    /// Deadline applied to each check, `None` when disabled
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait
    }

    pub fn notifier(&self) -> &StatusChangeNotifier {
        &self.notifier
    }

    /// Check every indicator; nothing is suppressed
    pub async fn check(&self) -> Result<HealthCheckStatus> {
        self.check_with(&IndicatorFilter::default()).await
    }

    /// Check every indicator, suppressing those `matcher` rejects
    ///
    /// Suppressed indicators still run and are still subject to the deadline;
    /// their results are reported but do not affect the verdict. Fails only
    /// when no tokio runtime is available to run the checks.
    pub async fn check_with(&self, matcher: &dyn IndicatorMatcher) -> Result<HealthCheckStatus> {
        let runtime = Handle::try_current()
            .map_err(|e| HealthError::runtime(format!("No runtime to run health checks: {}", e)))?;

        if self.indicators.is_empty() {
            let status = HealthCheckStatus::empty();
            self.publish(&status, false);
            return Ok(status);
        }

        let started = Instant::now();
        let suppressed: Vec<bool> = self
            .indicators
            .iter()
            .map(|indicator| !matcher.matches(indicator.as_ref()))
            .collect();

        let mut outstanding = OutstandingTasks::with_capacity(self.indicators.len());
        let mut pending = FuturesUnordered::new();
        for (index, indicator) in self.indicators.iter().enumerate() {
            let (callback, receiver) = HealthIndicatorCallback::channel();
            let indicator = indicator.clone();
            debug!(indicator = indicator.name(), "Dispatching health check");

            let task = runtime.spawn(async move { indicator.check(callback).await });
            outstanding.push(task.abort_handle());
            pending.push(async move { (index, await_report(task, receiver).await) });
        }

        let mut reports: Vec<Option<Health>> = vec![None; self.indicators.len()];
        let deadline = async {
            match self.max_wait {
                Some(max_wait) => tokio::time::sleep(max_wait).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                next = pending.next() => match next {
                    Some((index, health)) => {
                        debug!(
                            indicator = self.indicators[index].name(),
                            healthy = health.is_healthy(),
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "Health check reported"
                        );
                        outstanding.complete(index);
                        reports[index] = Some(health);
                    }
                    None => break,
                },
                _ = &mut deadline => break,
            }
        }
        drop(pending);

        let mut timed_out = false;
        let mut results = Vec::new();
        let mut suppressed_results = Vec::new();
        for (index, report) in reports.into_iter().enumerate() {
            let indicator = &self.indicators[index];
            let health = match report {
                Some(health) => health,
                None => {
                    warn!(indicator = indicator.name(), "Health check timed out");
                    outstanding.abort(index);
                    timed_out = true;
                    Health::timed_out()
                }
            };
            let health = health
                .to_builder()
                .with_reserved(NAME_KEY, Value::String(indicator.name().to_string()))
                .build();

            if suppressed[index] {
                suppressed_results.push(health);
            } else {
                results.push(health);
            }
        }

        let status = HealthCheckStatus::create(results, suppressed_results);
        debug!(
            healthy = status.is_healthy(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Health check aggregation complete"
        );
        self.publish(&status, timed_out);
        Ok(status)
    }

    fn publish(&self, status: &HealthCheckStatus, timed_out: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record(CheckOutcome::of(status, timed_out));
        }
        self.notifier.notify(status);
    }
}

/// Indicator tasks that have not reported yet
///
/// Dropping the set aborts every remaining task, so a caller that abandons
/// `check_with` does not leave its indicators running.
struct OutstandingTasks {
    handles: Vec<Option<AbortHandle>>,
}

impl OutstandingTasks {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, handle: AbortHandle) {
        self.handles.push(Some(handle));
    }

    fn complete(&mut self, index: usize) {
        self.handles[index] = None;
    }

    fn abort(&mut self, index: usize) {
        if let Some(handle) = self.handles[index].take() {
            handle.abort();
        }
    }
}

impl Drop for OutstandingTasks {
    fn drop(&mut self) {
        for handle in self.handles.iter().flatten() {
            handle.abort();
        }
    }
}

/// Resolve one indicator's report from its callback and its task
///
/// A reported result always wins. A returned error or a panic becomes an
/// unhealthy result. An indicator that finishes without reporting stays
/// pending, so the deadline decides its fate.
async fn await_report(
    mut task: JoinHandle<anyhow::Result<()>>,
    mut receiver: oneshot::Receiver<Health>,
) -> Health {
    tokio::select! {
        biased;
        report = &mut receiver => match report {
            Ok(health) => health,
            Err(_) => match task.await {
                Ok(Err(error)) => failed(error),
                Err(join_error) if join_error.is_panic() => panicked(join_error),
                _ => std::future::pending().await,
            },
        },
        joined = &mut task => match joined {
            Ok(Err(error)) => receiver.try_recv().unwrap_or_else(|_| failed(error)),
            Err(join_error) if join_error.is_panic() => {
                receiver.try_recv().unwrap_or_else(|_| panicked(join_error))
            }
            _ => match receiver.await {
                Ok(health) => health,
                Err(_) => std::future::pending().await,
            },
        },
    }
}

fn failed(error: anyhow::Error) -> Health {
    warn!(error = %error, "Health indicator failed");
    Health::unhealthy_with(error)
}

fn panicked(join_error: JoinError) -> Health {
    let payload = join_error.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    warn!(panic = %message, "Health indicator panicked");
    Health::unhealthy_with(format!("panic: {}", message))
}

/// Builder for [`HealthCheckAggregator`]
#[derive(Default)]
pub struct HealthCheckAggregatorBuilder {
    indicators: Vec<Arc<dyn HealthIndicator>>,
    max_wait: Option<Duration>,
    cache_interval: Option<Duration>,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    metrics: Option<HealthMetrics>,
}

impl HealthCheckAggregatorBuilder {
    pub fn indicator(mut self, indicator: Arc<dyn HealthIndicator>) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn indicators<I>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn HealthIndicator>>,
    {
        self.indicators.extend(indicators);
        self
    }

    pub fn registry(self, registry: HealthIndicatorRegistry) -> Self {
        self.indicators(registry.into_indicators())
    }

    /// Deadline for each check; zero disables it
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Serve every indicator through a cache with this window
    pub fn cache_interval(mut self, interval: Duration) -> Self {
        self.cache_interval = Some(interval);
        self
    }

    pub fn event_dispatcher(mut self, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn metrics(mut self, metrics: HealthMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> HealthCheckAggregator {
        let indicators = match self.cache_interval {
            Some(interval) => self
                .indicators
                .into_iter()
                .map(|delegate| {
                    Arc::new(CachingHealthIndicator::wrap(delegate, interval))
                        as Arc<dyn HealthIndicator>
                })
                .collect(),
            None => self.indicators,
        };
        let max_wait = match self.max_wait.unwrap_or(DEFAULT_MAX_WAIT) {
            wait if wait.is_zero() => None,
            wait => Some(wait),
        };

        HealthCheckAggregator {
            indicators,
            max_wait,
            notifier: StatusChangeNotifier::new(self.dispatcher),
            metrics: self.metrics,
        }
    }
}

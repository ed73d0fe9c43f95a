//! Health check metrics
//!
//! Counts aggregate check outcomes in a prometheus registry.

use crate::core::health::HealthCheckStatus;
use crate::utils::error::{HealthError, Result};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome label recorded for one aggregate check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Healthy,
    Unhealthy,
    /// At least one indicator was cut off by the deadline
    Timeout,
}

impl CheckOutcome {
    pub fn of(status: &HealthCheckStatus, timed_out: bool) -> Self {
        if timed_out {
            CheckOutcome::Timeout
        } else if status.is_healthy() {
            CheckOutcome::Healthy
        } else {
            CheckOutcome::Unhealthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckOutcome::Healthy => "healthy",
            CheckOutcome::Unhealthy => "unhealthy",
            CheckOutcome::Timeout => "timeout",
        }
    }
}

/// Prometheus counters for aggregate checks
#[derive(Clone)]
pub struct HealthMetrics {
    registry: Registry,
    checks_total: IntCounterVec,
}

impl HealthMetrics {
    /// Create the counters and register them with `registry`
    pub fn new(registry: Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("checks_total", "Total number of aggregate health checks by outcome")
                .namespace("runtime_health"),
            &["status"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        Ok(Self {
            registry,
            checks_total,
        })
    }

    pub fn record(&self, outcome: CheckOutcome) {
        self.checks_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Current count for one outcome
    pub fn count(&self, outcome: CheckOutcome) -> u64 {
        self.checks_total
            .with_label_values(&[outcome.as_str()])
            .get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Text exposition of every metric in the registry
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| HealthError::Metrics(prometheus::Error::Msg(e.to_string())))
    }
}

impl std::fmt::Debug for HealthMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMetrics").finish_non_exhaustive()
    }
}

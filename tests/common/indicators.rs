//! Test indicators
//!
//! Indicators with scripted delays and outcomes, for exercising the
//! aggregator without real dependencies.

use async_trait::async_trait;
use runtime_health::{Health, HealthIndicator, HealthIndicatorCallback};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a scripted indicator does once its delay has passed
#[derive(Debug, Clone)]
pub enum Outcome {
    Healthy,
    Unhealthy,
    /// Return an error without informing
    Fail(&'static str),
    /// Drop the callback without informing
    Silent,
}

/// Sleeps, then follows its outcome
#[derive(Debug, Clone)]
pub struct ScriptedIndicator {
    name: String,
    delay: Duration,
    outcome: Outcome,
}

impl ScriptedIndicator {
    pub fn new(name: &str, outcome: Outcome) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            outcome,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<dyn HealthIndicator> {
        Arc::new(self)
    }
}

#[async_trait]
impl HealthIndicator for ScriptedIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.outcome {
            Outcome::Healthy => callback.inform(Health::healthy().build()),
            Outcome::Unhealthy => callback.inform(Health::unhealthy().build()),
            Outcome::Fail(message) => anyhow::bail!(message),
            Outcome::Silent => drop(callback),
        }
        Ok(())
    }
}

/// Healthy indicator counting how often it actually ran
#[derive(Debug, Clone, Default)]
pub struct CountingIndicator {
    calls: Arc<AtomicUsize>,
}

impl CountingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> Arc<dyn HealthIndicator> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl HealthIndicator for CountingIndicator {
    fn name(&self) -> &str {
        "counting"
    }

    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        callback.inform(Health::healthy().build());
        Ok(())
    }
}

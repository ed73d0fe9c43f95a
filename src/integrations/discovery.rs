//! Service-discovery status bridge
//!
//! Maps the aggregate verdict onto the instance status a registry expects,
//! either on demand or by following status-change events.

use crate::core::health::{
    EventDispatcher, HealthCheckAggregator, HealthCheckStatus, HealthCheckStatusChangedEvent,
    IndicatorMatcher,
};
use crate::utils::error::Result;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Instance status reported to a discovery registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceStatus {
    /// No verdict observed yet
    Starting,
    Up,
    Down,
}

impl From<&HealthCheckStatus> for InstanceStatus {
    fn from(status: &HealthCheckStatus) -> Self {
        if status.is_healthy() {
            InstanceStatus::Up
        } else {
            InstanceStatus::Down
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Starting => "STARTING",
            InstanceStatus::Up => "UP",
            InstanceStatus::Down => "DOWN",
        };
        f.write_str(s)
    }
}

/// Computes the instance status on demand
pub struct DiscoveryStatusHandler {
    aggregator: Arc<HealthCheckAggregator>,
    matcher: Option<Arc<dyn IndicatorMatcher>>,
}

impl DiscoveryStatusHandler {
    pub fn new(aggregator: Arc<HealthCheckAggregator>) -> Self {
        Self {
            aggregator,
            matcher: None,
        }
    }

    /// Only indicators matched by `matcher` decide the status
    pub fn with_matcher(mut self, matcher: Arc<dyn IndicatorMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Run a check and map its verdict
    pub async fn status(&self) -> Result<InstanceStatus> {
        let status = match &self.matcher {
            Some(matcher) => self.aggregator.check_with(matcher.as_ref()).await?,
            None => self.aggregator.check().await?,
        };
        Ok(InstanceStatus::from(&status))
    }
}

/// Follows status-change events and keeps the latest instance status
#[derive(Debug, Clone)]
pub struct DiscoveryStatusBridge {
    current: Arc<RwLock<InstanceStatus>>,
}

impl DiscoveryStatusBridge {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(InstanceStatus::Starting)),
        }
    }

    pub fn current(&self) -> InstanceStatus {
        *self.current.read()
    }
}

impl Default for DiscoveryStatusBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher for DiscoveryStatusBridge {
    fn publish(&self, event: HealthCheckStatusChangedEvent) {
        let next = InstanceStatus::from(event.status());
        let previous = std::mem::replace(&mut *self.current.write(), next);
        if previous != next {
            info!(from = %previous, to = %next, "Instance status updated");
        }
    }
}

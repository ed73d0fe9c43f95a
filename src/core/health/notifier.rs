//! Status-change notification
//!
//! The notifier remembers the last published verdict and emits one
//! [`HealthCheckStatusChangedEvent`] per flip, including the first verdict
//! ever observed.

use super::types::HealthCheckStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Published when the aggregate verdict changes
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckStatusChangedEvent {
    status: HealthCheckStatus,
    occurred_at: DateTime<Utc>,
}

impl HealthCheckStatusChangedEvent {
    pub fn new(status: HealthCheckStatus) -> Self {
        Self {
            status,
            occurred_at: Utc::now(),
        }
    }

    /// The status that caused the change
    pub fn status(&self) -> &HealthCheckStatus {
        &self.status
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Sink for status-change events
pub trait EventDispatcher: Send + Sync {
    fn publish(&self, event: HealthCheckStatusChangedEvent);
}

impl<F> EventDispatcher for F
where
    F: Fn(HealthCheckStatusChangedEvent) + Send + Sync,
{
    fn publish(&self, event: HealthCheckStatusChangedEvent) {
        self(event)
    }
}

/// Fan-out dispatcher backed by a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    sender: broadcast::Sender<HealthCheckStatusChangedEvent>,
}

impl BroadcastDispatcher {
    /// Create a dispatcher buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HealthCheckStatusChangedEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new(16)
    }
}

impl EventDispatcher for BroadcastDispatcher {
    fn publish(&self, event: HealthCheckStatusChangedEvent) {
        if self.sender.send(event).is_err() {
            debug!("No subscribers for health status change");
        }
    }
}

const UNKNOWN: u8 = 0;
const HEALTHY: u8 = 1;
const UNHEALTHY: u8 = 2;

fn encode(healthy: bool) -> u8 {
    if healthy { HEALTHY } else { UNHEALTHY }
}

/// Tracks the last published verdict and emits change events
pub struct StatusChangeNotifier {
    last: AtomicU8,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
}

impl StatusChangeNotifier {
    pub fn new(dispatcher: Option<Arc<dyn EventDispatcher>>) -> Self {
        Self {
            last: AtomicU8::new(UNKNOWN),
            dispatcher,
        }
    }

    /// Last published verdict, `None` before the first status
    pub fn last_verdict(&self) -> Option<bool> {
        match self.last.load(Ordering::Acquire) {
            HEALTHY => Some(true),
            UNHEALTHY => Some(false),
            _ => None,
        }
    }

    /// Record `status`; returns `true` when this call published a change
    ///
    /// Only the caller whose compare-and-set moves the verdict publishes, so
    /// overlapping checks emit one event per transition. No lock is held
    /// while the dispatcher runs.
    pub fn notify(&self, status: &HealthCheckStatus) -> bool {
        let next = encode(status.is_healthy());
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            if current == next {
                return false;
            }
            match self
                .last
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        if current == UNKNOWN {
            info!(healthy = status.is_healthy(), "Initial health status established");
        } else {
            info!(healthy = status.is_healthy(), "Health status changed");
        }

        if let Some(dispatcher) = &self.dispatcher {
            dispatcher.publish(HealthCheckStatusChangedEvent::new(status.clone()));
        }
        true
    }
}

impl Default for StatusChangeNotifier {
    fn default() -> Self {
        Self::new(None)
    }
}

//! Application state shared across HTTP handlers

use crate::config::HealthServerConfig;
use crate::core::health::{HealthCheckAggregator, IndicatorFilter};
use crate::monitoring::metrics::HealthMetrics;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker; all fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (shared read-only)
    pub config: Arc<HealthServerConfig>,
    /// Aggregator answering health requests
    pub aggregator: Arc<HealthCheckAggregator>,
    /// Suppression filter applied to the exposed status
    pub filter: Arc<IndicatorFilter>,
    /// Metrics rendered by `/metrics`
    pub metrics: HealthMetrics,
}

impl AppState {
    pub fn new(
        config: HealthServerConfig,
        aggregator: HealthCheckAggregator,
        metrics: HealthMetrics,
    ) -> Self {
        let filter = config.status.filter();
        Self {
            config: Arc::new(config),
            aggregator: Arc::new(aggregator),
            filter: Arc::new(filter),
            metrics,
        }
    }
}

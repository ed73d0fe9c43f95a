//! Server builder and run_server function
//!
//! Wires the configured indicators, the aggregator, metrics and the event
//! dispatcher into an [`HttpServer`].

use crate::config::HealthServerConfig;
use crate::core::health::{BroadcastDispatcher, HealthCheckStatusChangedEvent};
use crate::monitoring::metrics::HealthMetrics;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::Result;
use prometheus::Registry;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Server builder
pub struct ServerBuilder {
    config: HealthServerConfig,
    registry: Registry,
    dispatcher: BroadcastDispatcher,
}

impl ServerBuilder {
    pub fn new(config: HealthServerConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            dispatcher: BroadcastDispatcher::default(),
        }
    }

    /// Register metrics in `registry` instead of a private one
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Publish status changes through `dispatcher`
    pub fn with_dispatcher(mut self, dispatcher: BroadcastDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Build the application state
    pub fn build_state(self) -> Result<AppState> {
        let metrics = HealthMetrics::new(self.registry)?;
        let aggregator = self
            .config
            .aggregator_builder()?
            .metrics(metrics.clone())
            .event_dispatcher(Arc::new(self.dispatcher))
            .build();

        info!(
            indicators = aggregator.indicators().len(),
            caching = self.config.aggregator.cache_health_indicators,
            "Health aggregator configured"
        );
        Ok(AppState::new(self.config, aggregator, metrics))
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        Ok(HttpServer::new(self.build_state()?))
    }
}

/// Log every status change received on `events` until the sender is gone
pub async fn log_status_changes(mut events: broadcast::Receiver<HealthCheckStatusChangedEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => info!(
                healthy = event.status().is_healthy(),
                occurred_at = %event.occurred_at(),
                "{}",
                event.status()
            ),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Status change listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Run the server for `config`, logging status changes as they happen
pub async fn run_server(config: HealthServerConfig) -> Result<()> {
    let dispatcher = BroadcastDispatcher::default();
    tokio::spawn(log_status_changes(dispatcher.subscribe()));

    info!(
        "Serving health status at http://{}{}",
        config.server.address(),
        config.server.path
    );
    ServerBuilder::new(config)
        .with_dispatcher(dispatcher)
        .build()?
        .start()
        .await
}

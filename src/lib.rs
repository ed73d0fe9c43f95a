//! # runtime-health
//!
//! Concurrent health-check aggregation for running services.
//!
//! ## Features
//!
//! - **Concurrent fan-out**: every indicator runs on its own task
//! - **Bounded waits**: indicators that miss the deadline are reported as timed out
//! - **Cached probes**: expensive indicators are refreshed by one caller at a time
//! - **Status-change events**: exactly one event per verdict flip
//! - **Metrics**: prometheus counters per check outcome
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runtime_health::{HealthCheckAggregator, HealthIndicators};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = HealthCheckAggregator::builder()
//!         .indicator(HealthIndicators::always_healthy("db"))
//!         .indicator(HealthIndicators::always_unhealthy("queue"))
//!         .max_wait(Duration::from_secs(1))
//!         .build();
//!
//!     let status = aggregator.check().await?;
//!     println!("{}", status);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod integrations;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::HealthServerConfig;
pub use core::health::{
    BroadcastDispatcher, EventDispatcher, Health, HealthBuilder, HealthCheckAggregator,
    HealthCheckStatus, HealthCheckStatusChangedEvent, HealthIndicator, HealthIndicatorCallback,
    HealthIndicatorRegistry, HealthIndicators, IndicatorFilter, IndicatorMatcher,
    IndicatorMatchers,
};
pub use integrations::{HttpHealthIndicator, InstanceStatus};
pub use monitoring::HealthMetrics;
pub use utils::error::{HealthError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Monitoring and observability
//!
//! This module provides the prometheus metrics recorded for health checks.

pub mod metrics;

pub use metrics::{CheckOutcome, HealthMetrics};

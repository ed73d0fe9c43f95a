//! Aggregator configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregation timing and caching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Serve indicators through a time-windowed cache
    #[serde(default = "default_true")]
    pub cache_health_indicators: bool,
    /// Cache window in milliseconds
    #[serde(default = "default_cache_interval_ms")]
    pub cache_interval_ms: u64,
    /// Deadline for one check in milliseconds, 0 disables it
    #[serde(default = "default_wait_interval_ms")]
    pub wait_interval_ms: u64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_health_indicators: default_true(),
            cache_interval_ms: default_cache_interval_ms(),
            wait_interval_ms: default_wait_interval_ms(),
        }
    }
}

impl AggregatorConfig {
    pub fn cache_interval(&self) -> Duration {
        Duration::from_millis(self.cache_interval_ms)
    }

    pub fn wait_interval(&self) -> Duration {
        Duration::from_millis(self.wait_interval_ms)
    }
}

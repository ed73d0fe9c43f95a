//! HTTP probe indicator configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One HTTP probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Indicator name, unique across the configuration
    pub name: String,
    /// URL probed with `GET`
    pub url: String,
    /// Per-probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
    /// Status treated as healthy in addition to 2xx
    #[serde(default)]
    pub expected_status: Option<u16>,
}

impl IndicatorConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            timeout_ms: default_probe_timeout_ms(),
            expected_status: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

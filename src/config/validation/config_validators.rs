//! Configuration validators
//!
//! This module provides validation implementations for every section of
//! `HealthServerConfig`.

use super::trait_def::Validate;
use crate::config::HealthServerConfig;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for HealthServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating health server configuration");

        self.aggregator.validate()?;
        self.status.validate()?;
        self.server.validate()?;
        self.logging.validate()?;

        let mut names = HashSet::new();
        for indicator in &self.indicators {
            indicator.validate()?;
            if !names.insert(indicator.name.as_str()) {
                return Err(format!("Duplicate indicator name: {}", indicator.name));
            }
        }

        debug!("Health server configuration validation completed");
        Ok(())
    }
}

impl Validate for AggregatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cache_health_indicators && self.cache_interval_ms == 0 {
            return Err("Cache interval must be greater than 0 when caching is enabled".to_string());
        }
        Ok(())
    }
}

impl Validate for StatusConfig {
    fn validate(&self) -> Result<(), String> {
        for name in &self.included_indicators {
            if name.is_empty() {
                return Err("Included indicator names cannot be empty".to_string());
            }
            if self.excluded_indicators.contains(name) {
                return Err(format!(
                    "Indicator '{}' is both included and excluded",
                    name
                ));
            }
        }
        if self.excluded_indicators.iter().any(String::is_empty) {
            return Err("Excluded indicator names cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if !self.path.starts_with('/') {
            return Err(format!("Health path must start with '/': {}", self.path));
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for IndicatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Indicator name cannot be empty".to_string());
        }

        let url = url::Url::parse(&self.url)
            .map_err(|e| format!("Invalid URL for indicator '{}': {}", self.name, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Indicator '{}' must use http or https, got {}",
                self.name,
                url.scheme()
            ));
        }

        if self.timeout_ms == 0 {
            return Err(format!(
                "Timeout for indicator '{}' must be greater than 0",
                self.name
            ));
        }

        if let Some(status) = self.expected_status {
            if !(100..=599).contains(&status) {
                return Err(format!(
                    "Expected status {} for indicator '{}' is not a valid HTTP status",
                    status, self.name
                ));
            }
        }

        Ok(())
    }
}

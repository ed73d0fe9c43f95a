//! Configuration management for the health server
//!
//! This module handles loading and validation of the server configuration
//! and turns it into the engine's building blocks.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::health::{HealthCheckAggregatorBuilder, HealthIndicator, HealthIndicatorRegistry};
use crate::integrations::http::HttpHealthIndicator;
use crate::utils::error::{HealthError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Prefix of every environment variable read by [`HealthServerConfig::from_env`]
pub const ENV_PREFIX: &str = "HEALTH_";

/// Main configuration struct for the health server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthServerConfig {
    #[serde(default)]
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub status: StatusConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

impl HealthServerConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HealthError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| HealthError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `HEALTH_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which resolves variable names
    ///
    /// Unset variables keep their defaults. `HEALTH_INDICATORS` holds
    /// comma-separated `name=url` pairs; list variables are comma-separated.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut config = Self::default();

        if let Some(value) = var("AGGREGATOR_CACHE_HEALTH_INDICATORS") {
            config.aggregator.cache_health_indicators =
                parse_var("AGGREGATOR_CACHE_HEALTH_INDICATORS", &value)?;
        }
        if let Some(value) = var("AGGREGATOR_CACHE_INTERVAL_MS") {
            config.aggregator.cache_interval_ms = parse_var("AGGREGATOR_CACHE_INTERVAL_MS", &value)?;
        }
        if let Some(value) = var("AGGREGATOR_WAIT_INTERVAL_MS") {
            config.aggregator.wait_interval_ms = parse_var("AGGREGATOR_WAIT_INTERVAL_MS", &value)?;
        }
        if let Some(value) = var("STATUS_INCLUDED_INDICATORS") {
            config.status.included_indicators = split_list(&value);
        }
        if let Some(value) = var("STATUS_EXCLUDED_INDICATORS") {
            config.status.excluded_indicators = split_list(&value);
        }
        if let Some(value) = var("SERVER_HOST") {
            config.server.host = value;
        }
        if let Some(value) = var("SERVER_PORT") {
            config.server.port = parse_var("SERVER_PORT", &value)?;
        }
        if let Some(value) = var("SERVER_PATH") {
            config.server.path = value;
        }
        if let Some(value) = var("LOG_LEVEL") {
            config.logging.level = value;
        }
        if let Some(value) = var("LOG_JSON") {
            config.logging.json = parse_var("LOG_JSON", &value)?;
        }
        if let Some(value) = var("INDICATORS") {
            config.indicators = split_list(&value)
                .into_iter()
                .map(|pair| match pair.split_once('=') {
                    Some((name, url)) => Ok(IndicatorConfig::new(name.trim(), url.trim())),
                    None => Err(HealthError::Config(format!(
                        "{}INDICATORS entry '{}' must be name=url",
                        ENV_PREFIX, pair
                    ))),
                })
                .collect::<Result<_>>()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(HealthError::Config)
    }

    /// HTTP probe indicators in configuration order
    pub fn build_indicators(&self) -> Result<HealthIndicatorRegistry> {
        let mut registry = HealthIndicatorRegistry::new();
        for indicator in &self.indicators {
            let probe: Arc<dyn HealthIndicator> = Arc::new(HttpHealthIndicator::from_config(indicator)?);
            registry.register(probe)?;
        }
        Ok(registry)
    }

    /// Aggregator builder seeded with the configured indicators and timing
    pub fn aggregator_builder(&self) -> Result<HealthCheckAggregatorBuilder> {
        let mut builder = crate::core::health::HealthCheckAggregator::builder()
            .registry(self.build_indicators()?)
            .max_wait(self.aggregator.wait_interval());
        if self.aggregator.cache_health_indicators {
            builder = builder.cache_interval(self.aggregator.cache_interval());
        }
        Ok(builder)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        HealthError::Config(format!("Invalid value for {}{}: {}", ENV_PREFIX, name, e))
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

//! HTTP probe indicator

use crate::config::IndicatorConfig;
use crate::core::health::{Health, HealthIndicator, HealthIndicatorCallback};
use crate::utils::error::{HealthError, Result};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Probes a URL with `GET`
///
/// Healthy when the response status is 2xx or equals the expected status.
/// Transport failures (refused connections, timeouts) are returned as
/// errors.
#[derive(Debug, Clone)]
pub struct HttpHealthIndicator {
    name: String,
    url: Url,
    expected_status: Option<StatusCode>,
    client: Client,
}

impl HttpHealthIndicator {
    pub fn new(name: impl Into<String>, url: &str, timeout: Duration) -> Result<Self> {
        let name = name.into();
        let url = Url::parse(url)
            .map_err(|e| HealthError::config(format!("Invalid URL for '{}': {}", name, e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name,
            url,
            expected_status: None,
            client,
        })
    }

    pub fn from_config(config: &IndicatorConfig) -> Result<Self> {
        let indicator = Self::new(config.name.clone(), &config.url, config.timeout())?;
        match config.expected_status {
            Some(status) => indicator.with_expected_status(status),
            None => Ok(indicator),
        }
    }

    /// Also accept `status` as healthy
    pub fn with_expected_status(mut self, status: u16) -> Result<Self> {
        let status = StatusCode::from_u16(status).map_err(|e| {
            HealthError::config(format!("Invalid expected status for '{}': {}", self.name, e))
        })?;
        self.expected_status = Some(status);
        Ok(self)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn accepts(&self, status: StatusCode) -> bool {
        status.is_success() || self.expected_status == Some(status)
    }
}

#[async_trait]
impl HealthIndicator for HttpHealthIndicator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self, callback: HealthIndicatorCallback) -> anyhow::Result<()> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", self.url))?;
        let elapsed = started.elapsed();
        let status = response.status();
        debug!(
            indicator = %self.name,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "HTTP probe completed"
        );

        let builder = if self.accepts(status) {
            Health::healthy()
        } else {
            Health::unhealthy()
        };
        let health = builder
            .with_detail("url", self.url.as_str())?
            .with_detail("status_code", status.as_u16())?
            .with_detail("response_time_ms", elapsed.as_millis() as u64)?
            .build();
        callback.inform(health);
        Ok(())
    }
}

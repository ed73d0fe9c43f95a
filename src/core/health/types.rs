//! Health result types
//!
//! This module defines the immutable result reported by a single indicator
//! and the composite status produced by one aggregation pass.

use crate::utils::error::{HealthError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Detail key carrying the description of a failure
pub const ERROR_KEY: &str = "error";
/// Detail key carrying the reporting indicator's name
pub const NAME_KEY: &str = "name";
/// Legacy identity key, reserved so indicators cannot spoof it
pub const CLASS_NAME_KEY: &str = "className";
/// Detail key marking a result served from the cache
pub const CACHE_KEY: &str = "cache";

/// Error text attached to indicators cut off by the aggregation deadline
pub const TIMEOUT_MESSAGE: &str = "Timed out waiting for response";

const RESERVED_KEYS: [&str; 4] = [ERROR_KEY, NAME_KEY, CLASS_NAME_KEY, CACHE_KEY];

/// Result reported by one health indicator
///
/// Details keep insertion order. Instances are only created through
/// [`HealthBuilder`] and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    healthy: bool,
    details: Map<String, Value>,
}

impl Health {
    /// Start building a healthy result
    pub fn healthy() -> HealthBuilder {
        HealthBuilder::new(true)
    }

    /// Start building an unhealthy result
    pub fn unhealthy() -> HealthBuilder {
        HealthBuilder::new(false)
    }

    /// Unhealthy result carrying `error` as its failure description
    pub fn unhealthy_with(error: impl fmt::Display) -> Health {
        Self::unhealthy().with_exception(error).build()
    }

    /// Result for an indicator that did not report before the deadline
    pub fn timed_out() -> Health {
        Self::unhealthy().with_exception(TIMEOUT_MESSAGE).build()
    }

    /// Re-open a builder seeded with this result's verdict and details
    pub fn to_builder(&self) -> HealthBuilder {
        HealthBuilder {
            healthy: self.healthy,
            details: self.details.clone(),
        }
    }

    /// Whether the indicator reported healthy
    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// All details in insertion order
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Look up a single detail
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    /// The failure description, if any
    pub fn error_message(&self) -> Option<&str> {
        self.details.get(ERROR_KEY).and_then(Value::as_str)
    }

    /// Name of the indicator that produced this result, once attached
    pub fn name(&self) -> Option<&str> {
        self.details.get(NAME_KEY).and_then(Value::as_str)
    }

    /// Whether this result was served from a cache
    pub fn is_cached(&self) -> bool {
        self.details
            .get(CACHE_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Health[isHealthy={}, details={{", self.healthy)?;
        for (i, (key, value)) in self.details.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Value::String(s) => write!(f, "{}={}", key, s)?,
                other => write!(f, "{}={}", key, other)?,
            }
        }
        f.write_str("}]")
    }
}

impl From<&Health> for HealthBuilder {
    fn from(health: &Health) -> Self {
        health.to_builder()
    }
}

/// Builder for [`Health`]
#[derive(Debug, Clone)]
pub struct HealthBuilder {
    healthy: bool,
    details: Map<String, Value>,
}

impl HealthBuilder {
    fn new(healthy: bool) -> Self {
        Self {
            healthy,
            details: Map::new(),
        }
    }

    /// Record a detail
    ///
    /// Fails with [`HealthError::InvalidArgument`] for an empty key, a null
    /// value, or one of the reserved keys (`error`, `name`, `className`,
    /// `cache`), which are owned by the engine.
    pub fn with_detail<K, V>(mut self, key: K, value: V) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(HealthError::invalid_argument("Key must not be empty"));
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(HealthError::invalid_argument(format!(
                "Detail key '{}' is reserved",
                key
            )));
        }
        let value = value.into();
        if value.is_null() {
            return Err(HealthError::invalid_argument(format!(
                "Data for '{}' must not be null",
                key
            )));
        }
        self.details.insert(key, value);
        Ok(self)
    }

    /// Record the failure that made this result unhealthy under `error`
    ///
    /// Uses the alternate format so `anyhow` errors render their full chain.
    pub fn with_exception(self, error: impl fmt::Display) -> Self {
        self.with_reserved(ERROR_KEY, Value::String(format!("{:#}", error)))
    }

    pub(crate) fn with_reserved(mut self, key: &'static str, value: Value) -> Self {
        self.details.insert(key.to_string(), value);
        self
    }

    /// Finish the result
    pub fn build(self) -> Health {
        Health {
            healthy: self.healthy,
            details: self.details,
        }
    }
}

/// Composite status of one aggregation pass
///
/// `healthy` is derived from `results` at construction, so it always equals
/// the conjunction of every non-suppressed result. Suppressed results are
/// reported for visibility only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCheckStatus {
    healthy: bool,
    results: Vec<Health>,
    suppressed_results: Vec<Health>,
}

impl HealthCheckStatus {
    /// Build a status, deriving the verdict from `results`
    pub fn create(results: Vec<Health>, suppressed_results: Vec<Health>) -> Self {
        let healthy = results.iter().all(Health::is_healthy);
        Self {
            healthy,
            results,
            suppressed_results,
        }
    }

    /// Status of an empty indicator set
    pub fn empty() -> Self {
        Self::create(Vec::new(), Vec::new())
    }

    /// The aggregate verdict
    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Results that contribute to the verdict, in registration order
    pub fn results(&self) -> &[Health] {
        &self.results
    }

    /// Results excluded from the verdict, in registration order
    pub fn suppressed_results(&self) -> &[Health] {
        &self.suppressed_results
    }

    /// Find a result (suppressed or not) by indicator name
    pub fn result_for(&self, name: &str) -> Option<&Health> {
        self.results
            .iter()
            .chain(self.suppressed_results.iter())
            .find(|health| health.name() == Some(name))
    }
}

impl fmt::Display for HealthCheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HealthCheckStatus[isHealthy={}, indicators=[", self.healthy)?;
        write_list(f, &self.results)?;
        f.write_str("], suppressedIndicators=[")?;
        write_list(f, &self.suppressed_results)?;
        f.write_str("]]")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, healths: &[Health]) -> fmt::Result {
    for (i, health) in healths.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", health)?;
    }
    Ok(())
}

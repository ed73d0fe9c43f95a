//! Ordered registry of named indicators

use super::indicator::HealthIndicator;
use crate::utils::error::{HealthError, Result};
use std::sync::Arc;

/// Indicators in registration order, unique by name
#[derive(Default, Clone)]
pub struct HealthIndicatorRegistry {
    indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthIndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, failing on the first invalid indicator
    pub fn from_indicators<I>(indicators: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn HealthIndicator>>,
    {
        let mut registry = Self::new();
        for indicator in indicators {
            registry.register(indicator)?;
        }
        Ok(registry)
    }

    /// Add an indicator; empty and duplicate names are rejected
    pub fn register(&mut self, indicator: Arc<dyn HealthIndicator>) -> Result<()> {
        let name = indicator.name();
        if name.is_empty() {
            return Err(HealthError::invalid_argument(
                "Indicator name must not be empty",
            ));
        }
        if self.contains(name) {
            return Err(HealthError::invalid_argument(format!(
                "Indicator '{}' is already registered",
                name
            )));
        }
        self.indicators.push(indicator);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indicators.iter().any(|indicator| indicator.name() == name)
    }

    pub fn indicators(&self) -> &[Arc<dyn HealthIndicator>] {
        &self.indicators
    }

    pub fn into_indicators(self) -> Vec<Arc<dyn HealthIndicator>> {
        self.indicators
    }

    pub fn names(&self) -> Vec<&str> {
        self.indicators.iter().map(|indicator| indicator.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl std::fmt::Debug for HealthIndicatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthIndicatorRegistry")
            .field("indicators", &self.names())
            .finish()
    }
}

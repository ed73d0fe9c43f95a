//! Status exposure configuration

use crate::core::health::{IndicatorFilter, IndicatorMatchers};
use serde::{Deserialize, Serialize};

/// Which indicators count toward the exposed verdict
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub included_indicators: Vec<String>,
    #[serde(default)]
    pub excluded_indicators: Vec<String>,
}

impl StatusConfig {
    /// Suppression filter for the exposed status
    pub fn filter(&self) -> IndicatorFilter {
        IndicatorMatchers::includes(self.included_indicators.iter().cloned())
            .excludes(self.excluded_indicators.iter().cloned())
            .build()
    }
}

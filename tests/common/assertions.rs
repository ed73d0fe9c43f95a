//! Custom test assertions
//!
//! Provides domain-specific assertions for aggregate statuses.

use runtime_health::HealthCheckStatus;

/// Assertions for HealthCheckStatus
pub trait StatusAssertions {
    /// Assert the named indicator reported with the given verdict
    fn assert_indicator(&self, name: &str, healthy: bool);

    /// Assert the named indicator carries `error`
    fn assert_error(&self, name: &str, error: &str);

    /// Assert the order of the non-suppressed results
    fn assert_order(&self, names: &[&str]);
}

impl StatusAssertions for HealthCheckStatus {
    fn assert_indicator(&self, name: &str, healthy: bool) {
        let health = self
            .result_for(name)
            .unwrap_or_else(|| panic!("No result for indicator '{}' in {}", name, self));
        assert_eq!(
            health.is_healthy(),
            healthy,
            "Unexpected verdict for '{}': {}",
            name,
            health
        );
    }

    fn assert_error(&self, name: &str, error: &str) {
        let health = self
            .result_for(name)
            .unwrap_or_else(|| panic!("No result for indicator '{}' in {}", name, self));
        assert_eq!(health.error_message(), Some(error), "in {}", health);
    }

    fn assert_order(&self, names: &[&str]) {
        let actual: Vec<&str> = self.results().iter().filter_map(|h| h.name()).collect();
        assert_eq!(actual, names);
    }
}

/// Assert a duration is within bounds
#[macro_export]
macro_rules! assert_duration_within {
    ($duration:expr, $max_ms:expr) => {
        let millis = $duration.as_millis();
        assert!(
            millis <= $max_ms,
            "Duration {} ms exceeded maximum {} ms",
            millis,
            $max_ms
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_duration_within_macro() {
        use std::time::Duration;
        assert_duration_within!(Duration::from_millis(50), 100);
    }
}

//! Configuration integration tests
//!
//! Loading configuration files and turning them into a working aggregator.

#[cfg(test)]
mod tests {
    use crate::{assert_err, assert_ok};
    use runtime_health::config::{HealthServerConfig, IndicatorConfig};
    use runtime_health::HealthError;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config("{}\n");

        let config = assert_ok!(HealthServerConfig::from_file(file.path()).await);

        assert!(config.aggregator.cache_health_indicators);
        assert_eq!(config.aggregator.cache_interval(), Duration::from_millis(5000));
        assert_eq!(config.aggregator.wait_interval(), Duration::from_millis(1000));
        assert_eq!(config.server.port, 8077);
        assert_eq!(config.server.path, "/healthcheck");
        assert_eq!(config.logging.level, "info");
        assert!(config.indicators.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let file = write_config(
            r#"
server:
  path: "no-leading-slash"
"#,
        );

        let err = assert_err!(HealthServerConfig::from_file(file.path()).await);
        assert!(matches!(err, HealthError::Config(_)));
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[tokio::test]
    async fn test_duplicate_indicators_rejected() {
        let file = write_config(
            r#"
indicators:
  - name: "db"
    url: "http://localhost/a"
  - name: "db"
    url: "http://localhost/b"
"#,
        );

        let err = assert_err!(HealthServerConfig::from_file(file.path()).await);
        assert!(err.to_string().contains("Duplicate indicator name"));
    }

    #[tokio::test]
    async fn test_example_configuration_is_valid() {
        let content = include_str!("../../config/health.yaml.example");

        let config = assert_ok!(HealthServerConfig::from_yaml(content));

        assert_eq!(config.indicators.len(), 2);
        assert!(!config.status.filter().matches_name("search"));
        assert!(config.status.filter().matches_name("db"));
    }

    #[tokio::test]
    async fn test_configured_aggregator_caches_indicators() {
        let config = HealthServerConfig {
            indicators: vec![
                IndicatorConfig::new("db", "http://localhost:1/db"),
                IndicatorConfig::new("cache", "http://localhost:1/cache"),
            ],
            ..Default::default()
        };

        let aggregator = assert_ok!(config.aggregator_builder()).build();

        assert_eq!(aggregator.max_wait(), Some(Duration::from_millis(1000)));
        let names: Vec<_> = aggregator.indicators().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["db", "cache"]);
    }
}

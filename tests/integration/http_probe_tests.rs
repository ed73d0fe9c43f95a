//! HTTP probe integration tests
//!
//! Aggregating real HTTP probes served by a mock server.

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::assertions::StatusAssertions;
    use runtime_health::config::{HealthServerConfig, IndicatorConfig};
    use runtime_health::{HealthCheckAggregator, HealthIndicator, HttpHealthIndicator};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/up"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        server
    }

    fn probe(name: &str, url: String) -> Arc<dyn HealthIndicator> {
        Arc::new(assert_ok!(HttpHealthIndicator::new(
            name,
            &url,
            Duration::from_secs(10)
        )))
    }

    #[tokio::test]
    async fn test_probes_are_aggregated() {
        let server = mock_server().await;
        let aggregator = HealthCheckAggregator::new(
            vec![
                probe("up", format!("{}/up", server.uri())),
                probe("down", format!("{}/down", server.uri())),
            ],
            Duration::from_secs(2),
        );

        let status = assert_ok!(aggregator.check().await);

        assert!(!status.is_healthy());
        status.assert_indicator("up", true);
        status.assert_indicator("down", false);
        let down = status.result_for("down").unwrap();
        assert_eq!(down.detail("status_code"), Some(&serde_json::json!(503)));
    }

    #[tokio::test]
    async fn test_slow_probe_cut_off_by_deadline() {
        let server = mock_server().await;
        let aggregator = HealthCheckAggregator::new(
            vec![
                probe("up", format!("{}/up", server.uri())),
                probe("slow", format!("{}/slow", server.uri())),
            ],
            Duration::from_millis(200),
        );

        let status = assert_ok!(aggregator.check().await);

        status.assert_indicator("up", true);
        status.assert_error("slow", "Timed out waiting for response");
    }

    #[tokio::test]
    async fn test_refused_connection_is_unhealthy_with_error() {
        // Nothing listens on port 1
        let aggregator = HealthCheckAggregator::new(
            vec![probe("gone", "http://127.0.0.1:1/health".to_string())],
            Duration::from_secs(2),
        );

        let status = assert_ok!(aggregator.check().await);

        let gone = status.result_for("gone").unwrap();
        assert!(!gone.is_healthy());
        assert!(gone.error_message().unwrap().starts_with("GET http://127.0.0.1:1/health failed"));
    }

    #[tokio::test]
    async fn test_configured_probes_with_suppression() {
        let server = mock_server().await;
        let mut config = HealthServerConfig::default();
        config.aggregator.cache_health_indicators = false;
        config.status.excluded_indicators = vec!["down".to_string()];
        config.indicators = vec![
            IndicatorConfig::new("up", format!("{}/up", server.uri())),
            IndicatorConfig::new("down", format!("{}/down", server.uri())),
        ];
        assert_ok!(config.validate());

        let aggregator = assert_ok!(config.aggregator_builder()).build();
        let status = assert_ok!(aggregator.check_with(&config.status.filter()).await);

        assert!(status.is_healthy());
        assert_eq!(status.suppressed_results().len(), 1);
        assert!(!status.suppressed_results()[0].is_healthy());
    }
}

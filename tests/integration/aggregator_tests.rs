//! Aggregation integration tests
//!
//! Verdicts, deadlines, suppression, caching and status-change events
//! observed through the public API.

#[cfg(test)]
mod tests {
    use crate::common::assertions::StatusAssertions;
    use crate::common::indicators::{CountingIndicator, Outcome, ScriptedIndicator};
    use crate::{assert_duration_within, assert_ok};
    use runtime_health::core::health::TIMEOUT_MESSAGE;
    use runtime_health::monitoring::CheckOutcome;
    use runtime_health::{
        BroadcastDispatcher, EventDispatcher, HealthCheckAggregator, HealthIndicators,
        HealthMetrics, IndicatorMatchers,
    };
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn scripted(name: &str, outcome: Outcome, delay_ms: u64) -> Arc<dyn runtime_health::HealthIndicator> {
        ScriptedIndicator::new(name, outcome)
            .after(Duration::from_millis(delay_ms))
            .shared()
    }

    // ==================== Verdicts ====================

    #[tokio::test]
    async fn test_fast_path_returns_before_deadline() {
        let aggregator = HealthCheckAggregator::new(
            vec![
                HealthIndicators::always_healthy("a"),
                HealthIndicators::always_unhealthy("b"),
            ],
            Duration::from_secs(1),
        );

        let started = Instant::now();
        let status = assert_ok!(aggregator.check().await);

        assert_duration_within!(started.elapsed(), 500);
        assert!(!status.is_healthy());
        assert_eq!(status.results().len(), 2);
        status.assert_indicator("a", true);
        status.assert_indicator("b", false);
    }

    #[tokio::test]
    async fn test_reported_unhealthy_has_no_error() {
        let aggregator = HealthCheckAggregator::new(
            vec![scripted("plain", Outcome::Unhealthy, 0)],
            Duration::from_secs(1),
        );

        let status = assert_ok!(aggregator.check().await);

        let plain = status.result_for("plain").unwrap();
        assert!(!plain.is_healthy());
        assert_eq!(plain.error_message(), None);
    }

    #[tokio::test]
    async fn test_error_equals_reported_unhealthy_with_message() {
        let aggregator = HealthCheckAggregator::new(
            vec![scripted("broken", Outcome::Fail("disk full"), 0)],
            Duration::from_secs(1),
        );

        let status = assert_ok!(aggregator.check().await);

        assert!(!status.is_healthy());
        status.assert_error("broken", "disk full");
    }

    // ==================== Deadline ====================

    #[tokio::test]
    async fn test_unresponsive_indicator_times_out_at_deadline() {
        let aggregator = HealthCheckAggregator::new(
            vec![
                scripted("quick", Outcome::Healthy, 0),
                scripted("stuck", Outcome::Healthy, 60_000),
            ],
            Duration::from_millis(50),
        );

        let started = Instant::now();
        let status = assert_ok!(aggregator.check().await);
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(50));
        assert_duration_within!(elapsed, 1000);
        assert!(!status.is_healthy());
        status.assert_indicator("quick", true);
        status.assert_error("stuck", "Timed out waiting for response");
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_indicator_reported_as_timeout() {
        let aggregator = HealthCheckAggregator::new(
            vec![scripted("mute", Outcome::Silent, 0)],
            Duration::from_millis(50),
        );

        let status = assert_ok!(aggregator.check().await);

        status.assert_error("mute", TIMEOUT_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_follows_registration_not_completion() {
        let aggregator = HealthCheckAggregator::new(
            vec![
                scripted("slowest", Outcome::Healthy, 300),
                scripted("fastest", Outcome::Healthy, 100),
                scripted("middle", Outcome::Unhealthy, 200),
                scripted("late", Outcome::Healthy, 5_000),
            ],
            Duration::from_secs(1),
        );

        let status = assert_ok!(aggregator.check().await);

        status.assert_order(&["slowest", "fastest", "middle", "late"]);
        status.assert_error("late", TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_overlapping_checks_are_independent() {
        let aggregator = Arc::new(HealthCheckAggregator::new(
            vec![
                scripted("a", Outcome::Healthy, 20),
                scripted("b", Outcome::Healthy, 10),
            ],
            Duration::from_secs(1),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aggregator = aggregator.clone();
                tokio::spawn(async move { aggregator.check().await })
            })
            .collect();

        for handle in handles {
            let status = assert_ok!(assert_ok!(handle.await));
            assert!(status.is_healthy());
            status.assert_order(&["a", "b"]);
        }
    }

    // ==================== Suppression ====================

    #[tokio::test]
    async fn test_include_list_suppresses_everything_else() {
        let aggregator = HealthCheckAggregator::new(
            vec![
                HealthIndicators::always_healthy("db"),
                HealthIndicators::always_unhealthy("reports"),
                HealthIndicators::always_unhealthy("search"),
            ],
            Duration::from_secs(1),
        );
        let filter = IndicatorMatchers::includes(["db"]).build();

        let status = assert_ok!(aggregator.check_with(&filter).await);

        assert!(status.is_healthy());
        status.assert_order(&["db"]);
        let suppressed: Vec<_> = status
            .suppressed_results()
            .iter()
            .filter_map(|h| h.name())
            .collect();
        assert_eq!(suppressed, vec!["reports", "search"]);
    }

    #[tokio::test]
    async fn test_all_suppressed_is_healthy() {
        let aggregator = HealthCheckAggregator::new(
            vec![HealthIndicators::always_unhealthy("db")],
            Duration::from_secs(1),
        );
        let filter = IndicatorMatchers::excludes(["db"]).build();

        let status = assert_ok!(aggregator.check_with(&filter).await);

        assert!(status.is_healthy());
        assert!(status.results().is_empty());
        assert_eq!(status.suppressed_results().len(), 1);
    }

    // ==================== Caching ====================

    #[tokio::test(start_paused = true)]
    async fn test_caching_aggregator_refreshes_after_window() {
        let counting = CountingIndicator::new();
        let aggregator = HealthCheckAggregator::builder()
            .indicator(counting.shared())
            .cache_interval(Duration::from_millis(100))
            .build();

        for _ in 0..5 {
            assert_ok!(aggregator.check().await);
        }
        assert_eq!(counting.calls(), 1);

        tokio::time::advance(Duration::from_millis(150)).await;
        let status = assert_ok!(aggregator.check().await);

        assert_eq!(counting.calls(), 2);
        assert!(!status.results()[0].is_cached());
        assert_eq!(status.results()[0].name(), Some("counting"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_indicator_within_deadline_does_not_duplicate_calls() {
        let counting = CountingIndicator::new();
        let cached = HealthIndicators::cache(counting.shared(), Duration::from_secs(10));
        let aggregator = Arc::new(HealthCheckAggregator::new(vec![cached], Duration::from_secs(1)));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let aggregator = aggregator.clone();
                tokio::spawn(async move { aggregator.check().await })
            })
            .collect();
        for handle in handles {
            assert_ok!(assert_ok!(handle.await));
        }

        assert_eq!(counting.calls(), 1);
    }

    // ==================== Metrics and events ====================

    #[tokio::test(start_paused = true)]
    async fn test_metrics_and_events_follow_checks() {
        let metrics = assert_ok!(HealthMetrics::new(prometheus::Registry::new()));
        let dispatcher = BroadcastDispatcher::default();
        let mut events = dispatcher.subscribe();

        let aggregator = HealthCheckAggregator::builder()
            .indicator(HealthIndicators::always_healthy("db"))
            .indicator(scripted("stuck", Outcome::Healthy, 60_000))
            .max_wait(Duration::from_millis(50))
            .metrics(metrics.clone())
            .event_dispatcher(Arc::new(dispatcher) as Arc<dyn EventDispatcher>)
            .build();

        assert_ok!(aggregator.check().await);
        assert_ok!(aggregator.check().await);

        assert_eq!(metrics.count(CheckOutcome::Timeout), 2);
        let event = assert_ok!(events.try_recv());
        assert!(!event.status().is_healthy());
        assert!(events.try_recv().is_err());

        let rendered = assert_ok!(metrics.render());
        assert!(rendered.contains("runtime_health_checks_total{status=\"timeout\"} 2"));
    }
}

//! Health check aggregation engine
//!
//! Indicators report a [`Health`] through a single-use callback; the
//! aggregator runs them concurrently under a deadline and folds the results
//! into a [`HealthCheckStatus`].
//!
//! # Module Structure
//!
//! - `types` - Health results and the aggregate status
//! - `indicator` - Indicator contract, callback and stock indicators
//! - `caching` - Time-windowed caching decorator
//! - `matcher` - Include/exclude filtering of indicators
//! - `registry` - Ordered, name-unique indicator registry
//! - `notifier` - Status-change detection and event dispatch
//! - `aggregator` - Concurrent fan-out with deadline
//! - `tests` - Aggregation test suite

pub mod aggregator;
pub mod caching;
pub mod indicator;
pub mod matcher;
pub mod notifier;
pub mod registry;
pub mod types;

pub use aggregator::{DEFAULT_MAX_WAIT, HealthCheckAggregator, HealthCheckAggregatorBuilder};
pub use caching::CachingHealthIndicator;
pub use indicator::{HealthIndicator, HealthIndicatorCallback, HealthIndicators};
pub use matcher::{IndicatorFilter, IndicatorFilterBuilder, IndicatorMatcher, IndicatorMatchers};
pub use notifier::{
    BroadcastDispatcher, EventDispatcher, HealthCheckStatusChangedEvent, StatusChangeNotifier,
};
pub use registry::HealthIndicatorRegistry;
pub use types::{
    CACHE_KEY, CLASS_NAME_KEY, ERROR_KEY, Health, HealthBuilder, HealthCheckStatus, NAME_KEY,
    TIMEOUT_MESSAGE,
};

//! Adapters around the health engine
//!
//! - `http` - Indicator probing an HTTP endpoint
//! - `discovery` - Instance status for service-discovery registries

pub mod discovery;
pub mod http;

pub use discovery::{DiscoveryStatusBridge, DiscoveryStatusHandler, InstanceStatus};
pub use http::HttpHealthIndicator;

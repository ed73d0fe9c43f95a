//! Configuration data models
//!
//! This module defines all configuration structures used by the health server.

#![allow(missing_docs)]

pub mod aggregator;
pub mod indicator;
pub mod logging;
pub mod server;
pub mod status;

pub use aggregator::*;
pub use indicator::*;
pub use logging::*;
pub use server::*;
pub use status::*;

/// Default values for configuration
pub fn default_true() -> bool {
    true
}

pub fn default_cache_interval_ms() -> u64 {
    5000
}

pub fn default_wait_interval_ms() -> u64 {
    1000
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8077
}

pub fn default_path() -> String {
    "/healthcheck".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_probe_timeout_ms() -> u64 {
    2000
}

//! Logging utilities
//!
//! This module installs the tracing subscriber used by the binary.

pub mod logging;

pub use logging::*;

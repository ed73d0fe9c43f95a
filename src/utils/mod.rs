//! Utility modules for the health engine
//!
//! - **error**: Error type, result alias and HTTP error responses
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

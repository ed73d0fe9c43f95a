//! Common test utilities for runtime-health
//!
//! - Test indicators with scripted behaviour
//! - Custom assertions and helpers

pub mod assertions;
pub mod indicators;

pub use indicators::{CountingIndicator, ScriptedIndicator};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

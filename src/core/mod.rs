//! Core functionality for the health engine
//!
//! This module contains the aggregation engine and its data structures.

pub mod health;

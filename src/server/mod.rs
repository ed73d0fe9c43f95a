//! HTTP server implementation
//!
//! A thin actix-web adapter exposing the aggregate health status.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;

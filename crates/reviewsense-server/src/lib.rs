//! ReviewSense HTTP server
//!
//! Exposes single-review and batch sentiment analysis over JSON, plus
//! health, docs and Prometheus metrics endpoints. The binary in `main.rs`
//! wires configuration, logging and the metrics exporter around
//! [`routes::create_router`].

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use analyzer::{PreparedReview, ReviewAnalyzer};
pub use config::ServerConfig;
pub use routes::{create_router, ApiError};
pub use state::AppState;

//! REST API for the PyroStage booking backend.
//!
//! Axum-based HTTP surface exposing the booking ledger and content
//! endpoints, with JWT bearer authentication, per-IP rate limiting,
//! request-id correlation, and OpenAPI documentation.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod state;

pub use app::create_app;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

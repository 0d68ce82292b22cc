//! HTTP middleware.

pub mod logging;
pub mod rate_limit;
pub mod request_id;

pub use logging::logging_middleware;
pub use rate_limit::{RateLimitConfig, RateLimitLayer};
pub use request_id::{request_id_middleware, RequestId};

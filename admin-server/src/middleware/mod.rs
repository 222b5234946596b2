//! HTTP middleware
//!
//! - [`logging_middleware`] - request logging
//! - [`require_https`] - HTTPS enforcement in production

pub mod https;
pub mod logging;

pub use https::require_https;
pub use logging::logging_middleware;

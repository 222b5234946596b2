//! Utilities
//!
//! - [`AppError`] - application error (from shared::error)
//! - [`ApiResponse`] - JSON envelope (from shared::error)
//! - logging, validation, JSON merge, list queries, timestamps, tokens

pub mod error;
pub mod extract;
pub mod json;
pub mod logger;
pub mod query;
pub mod time;
pub mod token;
pub mod validation;

// Re-export error types from the error module (which re-exports from shared)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, FieldErrors};
pub use extract::AppJson;
pub use query::{ListOptions, ListQuery};

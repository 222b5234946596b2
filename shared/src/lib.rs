//! Shared types for the commerce admin backend
//!
//! Error codes, the JSON error envelope and the wire enums (roles, sales
//! channel types) used by the server and by anything that talks to it.

pub mod error;
pub mod types;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, FieldErrors};
pub use http;
pub use serde::{Deserialize, Serialize};
pub use types::{Role, SalesChannelType};

//! Unified error system
//!
//! - [`ErrorCode`]: numeric error codes grouped by domain
//! - [`ErrorCategory`]: classification of codes by range
//! - [`AppError`]: error carrying a code, a message and optional details
//! - [`FieldErrors`]: per-field validation messages
//! - [`ApiResponse`]: the JSON envelope used for error bodies
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant (domain) errors
//! - 4xxx: User errors
//! - 5xxx: Sales channel errors
//! - 6xxx: Password reset errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, FieldErrors};
//!
//! let err = AppError::not_found("User");
//! assert_eq!(err.code, ErrorCode::NotFound);
//!
//! let mut fields = FieldErrors::new();
//! fields.add("email", "is not a valid email");
//! let err = AppError::invalid_fields(fields);
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod fields;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use fields::FieldErrors;
pub use types::{ApiResponse, AppError, AppResult};

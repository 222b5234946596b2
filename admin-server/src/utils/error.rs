//! Unified error handling
//!
//! The error envelope lives in `shared`; this module re-exports it and
//! maps repository failures onto it.
//!
//! ```ignore
//! Err(AppError::not_found("User user:abc"))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode, FieldErrors};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(field) => duplicate_field(&field),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// 409 for a unique field, with the field message under `details.errors`
pub fn duplicate_field(field: &str) -> AppError {
    match field {
        "email" => AppError::for_field(
            ErrorCode::EmailAlreadyRegistered,
            "email",
            "email already registered",
        ),
        "domain" => AppError::for_field(
            ErrorCode::DomainAlreadyExists,
            "domain",
            "domain already in use",
        ),
        other => AppError::for_field(
            ErrorCode::AlreadyExists,
            other,
            format!("{other} already exists"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_duplicate_email_maps_to_conflict_with_field() {
        let err: AppError = RepoError::Duplicate("email".into()).into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("email").unwrap()[0], "email already registered");
    }

    #[test]
    fn test_repo_errors_map_to_status() {
        let not_found: AppError = RepoError::NotFound("user x".into()).into();
        assert_eq!(not_found.http_status(), StatusCode::NOT_FOUND);

        let db: AppError = RepoError::Database("boom".into()).into();
        assert_eq!(db.http_status(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid: AppError = RepoError::Validation("bad".into()).into();
        assert_eq!(invalid.http_status(), StatusCode::BAD_REQUEST);
    }
}

//! Repository Module
//!
//! CRUD operations over the SurrealDB tables.

pub mod password_reset;
pub mod sales_channel;
pub mod user;

// Re-exports
pub use password_reset::PasswordResetRepository;
pub use sales_channel::SalesChannelRepository;
pub use user::UserRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique index violation; carries the offending field name
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        // unique index violations read "Database index `x` already contains ..."
        if message.contains("already contains") {
            let field = if message.contains("user_email") {
                "email"
            } else if message.contains("sales_channel_domain") {
                "domain"
            } else if message.contains("password_reset_token") {
                "token"
            } else {
                "id"
            };
            return RepoError::Duplicate(field.to_string());
        }
        RepoError::Database(message)
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID convention: "table:key" everywhere
// =============================================================================
//
//   - parse:   let id: RecordId = "user:abc".parse()?;
//   - build:   RecordId::from_table_key("user", "abc")
//   - CRUD:    db.select(id) / db.delete(id) take the RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an API id, requiring `table`
///
/// A wrong table or malformed id is reported as not found, the same as an
/// id that does not exist.
pub(crate) fn parse_id(table: &str, raw: &str) -> RepoResult<RecordId> {
    crate::db::models::serde_helpers::parse_record_id(table, raw)
        .ok_or_else(|| RepoError::NotFound(format!("{table} {raw}")))
}

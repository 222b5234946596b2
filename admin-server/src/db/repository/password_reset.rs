//! Password Reset Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::PasswordReset;
use crate::db::models::password_reset::TOKEN_LEN;
use crate::utils::time::now_millis;
use crate::utils::token::random_alphanumeric;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct PasswordResetRepository {
    base: BaseRepository,
}

impl PasswordResetRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a reset for `user` expiring `ttl_secs` from now
    pub async fn create(&self, user: &RecordId, ttl_secs: i64) -> RepoResult<PasswordReset> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE password_reset SET
                    user = $user,
                    token = $reset_token,
                    created_at = $now,
                    expires_at = $expires_at
                RETURN AFTER"#,
            )
            .bind(("user", user.clone()))
            .bind(("reset_token", random_alphanumeric(TOKEN_LEN)))
            .bind(("now", now))
            .bind(("expires_at", now + ttl_secs * 1000))
            .await?;

        let created: Option<PasswordReset> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create password reset".to_string()))
    }

    /// Unexpired reset with this token
    pub async fn find_valid(&self, token: &str) -> RepoResult<Option<PasswordReset>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM password_reset WHERE token = $reset_token")
            .bind(("reset_token", token.to_string()))
            .await?;
        let resets: Vec<PasswordReset> = result.take(0)?;
        let now = now_millis();
        Ok(resets.into_iter().find(|r| !r.is_expired(now)))
    }

    /// Remove every reset issued for `user`
    pub async fn delete_for_user(&self, user: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE password_reset WHERE user = $user")
            .bind(("user", user.clone()))
            .await?
            .check()?;
        Ok(())
    }

    /// Remove expired resets, returning how many were deleted
    pub async fn purge_expired(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("DELETE password_reset WHERE expires_at <= $now RETURN BEFORE")
            .bind(("now", now_millis()))
            .await?;
        let purged: Vec<PasswordReset> = result.take(0)?;
        Ok(purged.len())
    }

    /// Resets issued for `user`, including expired ones
    pub async fn find_for_user(&self, user: &RecordId) -> RepoResult<Vec<PasswordReset>> {
        let resets: Vec<PasswordReset> = self
            .base
            .db()
            .query("SELECT * FROM password_reset WHERE user = $user ORDER BY created_at")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(resets)
    }
}

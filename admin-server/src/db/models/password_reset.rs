//! Password Reset Model

use super::serde_helpers;
use super::user::UserView;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub const PASSWORD_RESET_TABLE: &str = "password_reset";

/// Length of a reset token
pub const TOKEN_LEN: usize = 32;

/// Pending password reset, stored in the `password_reset` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub token: String,
    #[serde(default)]
    pub created_at: i64,
    pub expires_at: i64,
}

impl PasswordReset {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at <= now_millis
    }
}

/// `{ user, token }` as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetView {
    pub user: UserView,
    pub token: String,
}

//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{USER_TABLE, User, UserDraft};
use crate::tenancy::TenantScope;
use crate::utils::time::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All users, ordered by a whitelisted `ORDER BY` clause
    pub async fn find_all(&self, order_by: &str) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!("SELECT * FROM user ORDER BY {order_by}"))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id (platform-wide)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let Ok(thing) = parse_id(USER_TABLE, id) else {
            return Ok(None);
        };
        self.find_by_record(&thing).await
    }

    pub async fn find_by_record(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(id.clone()).await?;
        Ok(user)
    }

    /// Find user by id, only if visible in `scope`
    pub async fn find_by_id_in(&self, id: &str, scope: &TenantScope) -> RepoResult<Option<User>> {
        let Ok(thing) = parse_id(USER_TABLE, id) else {
            return Ok(None);
        };
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM user WHERE id = $id AND {}",
                scope.user_clause()
            ))
            .bind(("id", thing))
            .bind(scope.domain_binding())
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by email (platform-wide)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.trim().to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by email, only if visible in `scope`
    pub async fn find_by_email_in(
        &self,
        email: &str,
        scope: &TenantScope,
    ) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM user WHERE email = $email AND {}",
                scope.user_clause()
            ))
            .bind(("email", email.trim().to_lowercase()))
            .bind(scope.domain_binding())
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find a user linked to a Facebook identity, or else by email, in `scope`
    pub async fn find_by_facebook_in(
        &self,
        facebook_id: &str,
        email: Option<&str>,
        scope: &TenantScope,
    ) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM user WHERE services.facebook = $facebook AND {}",
                scope.user_clause()
            ))
            .bind(("facebook", facebook_id.to_string()))
            .bind(scope.domain_binding())
            .await?;
        let users: Vec<User> = result.take(0)?;
        if let Some(user) = users.into_iter().next() {
            return Ok(Some(user));
        }
        match email {
            Some(email) if !email.trim().is_empty() => self.find_by_email_in(email, scope).await,
            _ => Ok(None),
        }
    }

    /// Create a user; the draft must carry a password
    pub async fn create(&self, draft: UserDraft) -> RepoResult<User> {
        if self.find_by_email(&draft.email).await?.is_some() {
            return Err(RepoError::Duplicate("email".to_string()));
        }

        let password = draft
            .password
            .as_deref()
            .ok_or_else(|| RepoError::Validation("password is required".to_string()))?;
        let hash_pass = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    profile = $profile,
                    services = $services,
                    sales_channel = $sales_channel,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("email", draft.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", draft.role))
            .bind(("profile", draft.profile))
            .bind(("services", draft.services))
            .bind(("sales_channel", draft.sales_channel))
            .bind(("now", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace the editable fields of a user with a validated draft
    ///
    /// The password hash only changes when the draft carries a password.
    pub async fn update(&self, id: &RecordId, draft: UserDraft) -> RepoResult<User> {
        if let Some(other) = self.find_by_email(&draft.email).await?
            && &other.id != id
        {
            return Err(RepoError::Duplicate("email".to_string()));
        }

        let hash_pass = match draft.password.as_deref() {
            Some(password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    email = $email,
                    hash_pass = $hash_pass OR hash_pass,
                    role = $role,
                    profile = $profile,
                    services = $services,
                    sales_channel = $sales_channel,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", id.clone()))
            .bind(("email", draft.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", draft.role))
            .bind(("profile", draft.profile))
            .bind(("services", draft.services))
            .bind(("sales_channel", draft.sales_channel))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<User> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Set a new password
    pub async fn set_password(&self, id: &RecordId, password: &str) -> RepoResult<User> {
        let hash_pass = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET hash_pass = $hash_pass, updated_at = $now RETURN AFTER")
            .bind(("id", id.clone()))
            .bind(("hash_pass", hash_pass))
            .bind(("now", now_millis()))
            .await?;
        let updated: Option<User> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user and its pending password resets
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let Ok(thing) = parse_id(USER_TABLE, id) else {
            return Ok(false);
        };
        if self.find_by_record(&thing).await?.is_none() {
            return Ok(false);
        }
        self.base
            .db()
            .query("DELETE password_reset WHERE user = $id; DELETE $id;")
            .bind(("id", thing))
            .await?
            .check()?;
        Ok(true)
    }
}

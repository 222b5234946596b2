use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{BackgroundTasks, Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::{PasswordResetRepository, SalesChannelRepository, UserRepository};
use crate::services::{FacebookGraph, GraphApiClient, Mailer, SendGridMailer};

/// Server state - shared handles passed to every handler
///
/// Cloning is cheap: the database handle is reference counted and the
/// services sit behind `Arc`.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | configuration (immutable) |
/// | db | Surreal<Db> | embedded document store |
/// | jwt_service | Arc<JwtService> | access tokens |
/// | mailer | Arc<dyn Mailer> | outbound mail |
/// | facebook | Arc<dyn FacebookGraph> | Facebook sign-in |
///
/// ```ignore
/// let user = state.users().find_by_id("user:abc").await?;
/// let status = state.mailer.send_mail(mail).await?;
/// ```
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub mailer: Arc<dyn Mailer>,
    pub facebook: Arc<dyn FacebookGraph>,
}

impl ServerState {
    /// Manual construction; tests use it to plug in doubles for mail and
    /// Facebook
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        mailer: Arc<dyn Mailer>,
        facebook: Arc<dyn FacebookGraph>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
            mailer,
            facebook,
        }
    }

    /// Open the store and build the production services
    ///
    /// 1. Database (`data_dir`, schema applied)
    /// 2. SendGrid mailer, Facebook Graph client, JWT service
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_service = DbService::new(&config.data_dir, &config.db_namespace, &config.db_database)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        let mailer: Arc<dyn Mailer> = Arc::new(SendGridMailer::new(
            &config.sendgrid,
            config.default_email.clone(),
        ));
        let facebook: Arc<dyn FacebookGraph> =
            Arc::new(GraphApiClient::new(config.facebook_graph_url.clone()));

        Ok(Self::new(config.clone(), db_service.db, mailer, facebook))
    }

    /// Register periodic maintenance
    ///
    /// - expired password reset purge
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let resets = self.password_resets();
        tasks.spawn_periodic(
            "purge_password_resets",
            Duration::from_secs(self.config.reset_purge_interval_secs.max(1)),
            move || {
                let resets = resets.clone();
                async move {
                    match resets.purge_expired().await {
                        Ok(0) => {}
                        Ok(n) => tracing::info!(purged = n, "Expired password resets purged"),
                        Err(e) => tracing::error!(error = %e, "Password reset purge failed"),
                    }
                }
            },
        );

        tasks.log_summary();
        tasks
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn sales_channels(&self) -> SalesChannelRepository {
        SalesChannelRepository::new(self.db.clone())
    }

    pub fn password_resets(&self) -> PasswordResetRepository {
        PasswordResetRepository::new(self.db.clone())
    }
}

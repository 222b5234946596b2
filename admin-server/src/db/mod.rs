//! Database Module
//!
//! Embedded SurrealDB document store on the RocksDB engine.

pub mod models;
pub mod repository;
pub mod schema;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service, owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the store at `path` and apply the schema
    pub async fn new(path: &str, namespace: &str, database: &str) -> Result<Self, AppError> {
        if let Err(e) = std::fs::create_dir_all(path) {
            return Err(AppError::database(format!(
                "Failed to create data directory {path}: {e}"
            )));
        }

        let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %path, namespace = %namespace, database = %database, "Database connection established (SurrealDB RocksDB)");

        schema::apply(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");

        Ok(Self { db })
    }

    /// Cheap liveness probe
    pub async fn is_healthy(db: &Surreal<Db>) -> bool {
        db.query("RETURN true").await.is_ok()
    }
}

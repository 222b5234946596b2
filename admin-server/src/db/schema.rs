//! Table and index definitions
//!
//! Tables are schemaless; field rules live in the model drafts. Unique
//! indexes back the email, domain and token constraints.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS user_sales_channel ON TABLE user FIELDS sales_channel;
DEFINE INDEX IF NOT EXISTS user_facebook ON TABLE user FIELDS services.facebook;

DEFINE TABLE IF NOT EXISTS sales_channel SCHEMALESS;
DEFINE INDEX IF NOT EXISTS sales_channel_domain ON TABLE sales_channel FIELDS domain UNIQUE;
DEFINE INDEX IF NOT EXISTS sales_channel_owner ON TABLE sales_channel FIELDS owner;

DEFINE TABLE IF NOT EXISTS password_reset SCHEMALESS;
DEFINE INDEX IF NOT EXISTS password_reset_token ON TABLE password_reset FIELDS token UNIQUE;
DEFINE INDEX IF NOT EXISTS password_reset_user ON TABLE password_reset FIELDS user;
"#;

/// Apply [`SCHEMA`]; safe to run on every start
pub async fn apply(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}

use std::str::FromStr;

use thiserror::Error;

use crate::auth::JwtConfig;
use crate::auth::jwt::generate_printable_secret;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ENVIRONMENT | development | development / test / production |
/// | IP | 0.0.0.0 | bind address |
/// | PORT | 9000 (8080 in production) | bind port |
/// | MANAGE_DOMAIN | manage.example.com | host name of the management console |
/// | DEFAULT_EMAIL | no-reply@api.com | sender of outbound mail |
/// | SENDGRID_KEY | required outside development | SendGrid API key |
/// | SENDGRID_API_URL | https://api.sendgrid.com | SendGrid base URL |
/// | ENABLE_SENDGRID | 1 | `0` disables real delivery |
/// | API_KEY | required outside development | master API key |
/// | JWT_SECRET | required outside development | HMAC secret (>= 32 chars) |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime |
/// | DATA_DIR | ./data | document store directory |
/// | DB_NAMESPACE / DB_DATABASE | commerce / admin | SurrealDB namespace and database |
/// | FACEBOOK_GRAPH_URL | https://graph.facebook.com | Graph API base URL |
/// | LOG_LEVEL / LOG_DIR | info / unset | logging |
///
/// # Example
///
/// ```ignore
/// ENVIRONMENT=production PORT=8080 JWT_SECRET=... cargo run -p admin-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment: development | test | production
    pub environment: String,
    /// Bind address
    pub ip: String,
    /// HTTP port
    pub port: u16,
    /// Host name that serves the management console
    pub manage_domain: String,
    /// Sender address used when a mail does not name one
    pub default_email: String,
    /// SendGrid delivery settings
    pub sendgrid: SendGridConfig,
    /// Master API key
    pub api_key: String,
    /// JWT settings
    pub jwt: JwtConfig,
    /// Document store directory (RocksDB)
    pub data_dir: String,
    pub db_namespace: String,
    pub db_database: String,
    /// Facebook Graph API base URL
    pub facebook_graph_url: String,
    /// Password reset lifetime (seconds)
    pub password_reset_ttl_secs: i64,
    /// Interval between expired reset purges (seconds)
    pub reset_purge_interval_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: String,
    pub api_url: String,
    /// `false` when `ENABLE_SENDGRID=0`; mails are logged and reported as accepted
    pub enabled: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("You must set the {0} environment variable")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

pub const DEFAULT_MANAGE_DOMAIN: &str = "manage.example.com";
pub const DEFAULT_EMAIL: &str = "no-reply@api.com";
const MIN_JWT_SECRET_LEN: usize = 32;

impl Config {
    /// Load configuration from environment variables
    ///
    /// Secrets (`SENDGRID_KEY`, `API_KEY`, `JWT_SECRET`) are mandatory outside
    /// development. In development a random JWT secret is generated when none
    /// is set, so tokens do not survive a restart.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env_string("ENVIRONMENT", "development");
        let development = environment == "development";
        let production = environment == "production";

        let default_port = if production { 8080 } else { 9000 };
        let default_database = if environment == "test" {
            "admin_test"
        } else {
            "admin"
        };

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() < MIN_JWT_SECRET_LEN => {
                return Err(ConfigError::Invalid {
                    name: "JWT_SECRET",
                    reason: format!("must be at least {MIN_JWT_SECRET_LEN} characters long"),
                });
            }
            Ok(secret) => secret,
            Err(_) if development => {
                tracing::warn!("JWT_SECRET not set, generating a temporary development key");
                generate_printable_secret()
            }
            Err(_) => return Err(ConfigError::Missing("JWT_SECRET")),
        };

        Ok(Self {
            ip: env_string("IP", "0.0.0.0"),
            port: env_parse("PORT", default_port)?,
            manage_domain: env_string("MANAGE_DOMAIN", DEFAULT_MANAGE_DOMAIN).to_lowercase(),
            default_email: env_string("DEFAULT_EMAIL", DEFAULT_EMAIL),
            sendgrid: SendGridConfig {
                api_key: require_secret("SENDGRID_KEY", development)?,
                api_url: env_string("SENDGRID_API_URL", "https://api.sendgrid.com"),
                enabled: env_string("ENABLE_SENDGRID", "1") != "0",
            },
            api_key: require_secret("API_KEY", development)?,
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes: env_parse("JWT_EXPIRATION_MINUTES", 1440)?,
                issuer: env_string("JWT_ISSUER", "admin-server"),
                audience: env_string("JWT_AUDIENCE", "admin-clients"),
            },
            data_dir: env_string("DATA_DIR", "./data"),
            db_namespace: env_string("DB_NAMESPACE", "commerce"),
            db_database: env_string("DB_DATABASE", default_database),
            facebook_graph_url: env_string("FACEBOOK_GRAPH_URL", "https://graph.facebook.com"),
            password_reset_ttl_secs: env_parse("PASSWORD_RESET_TTL_SECS", 3600)?,
            reset_purge_interval_secs: env_parse("RESET_PURGE_INTERVAL_SECS", 300)?,
            log_level: env_string("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment,
        })
    }

    /// Configuration for integration tests: fixed secret, mail disabled,
    /// document store under `data_dir`
    pub fn for_test(data_dir: impl Into<String>) -> Self {
        Self {
            environment: "test".into(),
            ip: "127.0.0.1".into(),
            port: 0,
            manage_domain: DEFAULT_MANAGE_DOMAIN.into(),
            default_email: DEFAULT_EMAIL.into(),
            sendgrid: SendGridConfig {
                api_key: String::new(),
                api_url: "http://127.0.0.1:9".into(),
                enabled: false,
            },
            api_key: "test-api-key".into(),
            jwt: JwtConfig {
                secret: "test-secret-that-is-long-enough-for-hs256".into(),
                expiration_minutes: 60,
                issuer: "admin-server".into(),
                audience: "admin-clients".into(),
            },
            data_dir: data_dir.into(),
            db_namespace: "commerce".into(),
            db_database: "admin_test".into(),
            facebook_graph_url: "http://127.0.0.1:9".into(),
            password_reset_ttl_secs: 3600,
            reset_purge_interval_secs: 300,
            log_level: "debug".into(),
            log_dir: None,
        }
    }

    /// `ip:port` socket address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// Is production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Is development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_string(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn require_secret(name: &'static str, development: bool) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if development => Ok(String::new()),
        _ => Err(ConfigError::Missing(name)),
    }
}

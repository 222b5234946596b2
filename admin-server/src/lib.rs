//! Admin Server - multi-tenant commerce administration backend
//!
//! # Architecture
//!
//! - **Tenancy** (`tenancy`): every request is scoped by its `Host` header,
//!   either to the management console or to one storefront domain
//! - **Database** (`db`): embedded SurrealDB storage (RocksDB engine)
//! - **Auth** (`auth`): JWT bearer tokens, HTTP Basic and Facebook sign-in,
//!   argon2 password hashes
//! - **HTTP API** (`api`): users, sales channels, password resets, auth
//! - **Services** (`services`): outbound mail and the Facebook Graph API
//!
//! # Module structure
//!
//! ```text
//! admin-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── tenancy/       # Host -> tenant scope
//! ├── auth/          # JWT, passwords, extractors, middleware
//! ├── db/            # models and repositories
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging, HTTPS enforcement
//! ├── services/      # mailer, facebook
//! └── utils/         # errors, logger, validation, json, list queries
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod services;
pub mod tenancy;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use tenancy::{Tenant, TenantScope};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

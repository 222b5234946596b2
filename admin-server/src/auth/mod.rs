//! Authentication and authorization
//!
//! - [`JwtService`] - access token issuing and validation
//! - [`CurrentUser`] - authenticated caller
//! - [`PasswordAuth`] - HTTP Basic sign-in extractor
//! - [`require_auth`] - authentication middleware
//! - [`require_roles`] - role gate middleware

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::PasswordAuth;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_roles};

use shared::Role;

/// Roles allowed on the management API
pub const ADMINS: &[Role] = &Role::ADMINS;

/// Platform administrators only
pub const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];

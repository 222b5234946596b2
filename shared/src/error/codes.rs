//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant (domain) errors
//! - 4xxx: User errors
//! - 5xxx: Sales channel errors
//! - 6xxx: Password reset errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value so clients in any language can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Third-party identity provider rejected the token
    ExternalAuthFailed = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Caller's role is not allowed on this route
    RoleNotAllowed = 2002,
    /// Caller does not own the resource
    NotOwner = 2003,

    // ==================== 3xxx: Tenant ====================
    /// Request has no Host header
    HostMissing = 3001,
    /// No sales channel serves the request domain
    DomainNotFound = 3002,
    /// Operation is only available on a storefront domain
    StorefrontRequired = 3003,
    /// Plain HTTP request in production
    HttpsRequired = 3004,

    // ==================== 4xxx: User ====================
    /// User not found
    UserNotFound = 4001,
    /// Email already registered
    EmailAlreadyRegistered = 4002,
    /// Users cannot change their own role
    CannotChangeOwnRole = 4005,

    // ==================== 5xxx: Sales Channel ====================
    /// Sales channel not found
    SalesChannelNotFound = 5001,
    /// Domain already used by another sales channel
    DomainAlreadyExists = 5002,
    /// Sales channel type cannot be changed
    SalesChannelTypeImmutable = 5003,
    /// Owner must be an existing store admin
    InvalidOwner = 5004,

    // ==================== 6xxx: Password Reset ====================
    /// Reset token unknown
    ResetTokenNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Mail provider rejected or failed the delivery
    MailDeliveryFailed = 9101,
    /// Upstream identity provider unreachable
    ExternalServiceError = 9102,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::ExternalAuthFailed => "Identity provider rejected the token",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleNotAllowed => "Your role is not allowed to do this",
            ErrorCode::NotOwner => "You do not have access to this data",

            // Tenant
            ErrorCode::HostMissing => "Host header is required",
            ErrorCode::DomainNotFound => "No sales channel is served on this domain",
            ErrorCode::StorefrontRequired => "Only available on a storefront domain",
            ErrorCode::HttpsRequired => "HTTPS is required",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => "email already registered",
            ErrorCode::CannotChangeOwnRole => "You can't change your own role",

            // Sales channel
            ErrorCode::SalesChannelNotFound => "Sales channel not found",
            ErrorCode::DomainAlreadyExists => "Domain is already in use",
            ErrorCode::SalesChannelTypeImmutable => {
                "SalesChannelType is not allowed to be modified by anyone"
            }
            ErrorCode::InvalidOwner => "Owner must be an existing store_admin",

            // Password reset
            ErrorCode::ResetTokenNotFound => "Password reset token not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MailDeliveryFailed => "Mail delivery failed",
            ErrorCode::ExternalServiceError => "External service error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::ExternalAuthFailed),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleNotAllowed),
            2003 => Ok(ErrorCode::NotOwner),

            // Tenant
            3001 => Ok(ErrorCode::HostMissing),
            3002 => Ok(ErrorCode::DomainNotFound),
            3003 => Ok(ErrorCode::StorefrontRequired),
            3004 => Ok(ErrorCode::HttpsRequired),

            // User
            4001 => Ok(ErrorCode::UserNotFound),
            4002 => Ok(ErrorCode::EmailAlreadyRegistered),
            4005 => Ok(ErrorCode::CannotChangeOwnRole),

            // Sales channel
            5001 => Ok(ErrorCode::SalesChannelNotFound),
            5002 => Ok(ErrorCode::DomainAlreadyExists),
            5003 => Ok(ErrorCode::SalesChannelTypeImmutable),
            5004 => Ok(ErrorCode::InvalidOwner),

            // Password reset
            6001 => Ok(ErrorCode::ResetTokenNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::MailDeliveryFailed),
            9102 => Ok(ErrorCode::ExternalServiceError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

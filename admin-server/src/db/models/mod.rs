//! Database Models

// Serde helpers
pub mod serde_helpers;

pub mod password_reset;
pub mod sales_channel;
pub mod user;

// Re-exports
pub use password_reset::{PASSWORD_RESET_TABLE, PasswordReset, PasswordResetView};
pub use sales_channel::{SALES_CHANNEL_TABLE, SalesChannel, SalesChannelDraft, SalesChannelView};
pub use user::{
    BillingAddress, DeliveryAddress, Profile, Services, USER_TABLE, User, UserDraft, UserId,
    UserView,
};

//! HTTP API
//!
//! Each resource module exposes a `router()`; [`crate::routes`] merges them
//! and applies the middleware stack.

pub mod auth;
pub mod health;
pub mod password_resets;
pub mod sales_channels;
pub mod users;

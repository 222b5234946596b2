//! External services
//!
//! - [`Mailer`] / [`SendGridMailer`] - outbound mail
//! - [`FacebookGraph`] / [`GraphApiClient`] - Facebook sign-in

pub mod facebook;
pub mod mailer;

pub use facebook::{FacebookError, FacebookGraph, FacebookProfile, GraphApiClient};
pub use mailer::{Mail, MailError, Mailer, SendGridMailer};

//! Outbound mail via the SendGrid v3 REST API (no SDK dependency)

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::core::config::SendGridConfig;

/// An outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    /// Sender; the configured default when `None`
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
    pub content: String,
    /// MIME type of `content`, `text/html` by default
    pub content_type: String,
}

impl Mail {
    pub fn html(to: impl Into<String>, subject: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            from: None,
            to: to.into(),
            subject: subject.into(),
            content: content.into(),
            content_type: "text/html".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Mail delivery backend
///
/// Returns the provider's HTTP status on acceptance.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_mail(&self, mail: Mail) -> Result<u16, MailError>;
}

/// SendGrid `/v3/mail/send` client
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    default_from: String,
    enabled: bool,
}

impl SendGridMailer {
    pub fn new(config: &SendGridConfig, default_from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            default_from: default_from.into(),
            enabled: config.enabled,
        }
    }

    /// v3 request body
    pub fn payload(&self, mail: &Mail) -> serde_json::Value {
        let from = mail.from.as_deref().unwrap_or(&self.default_from);
        json!({
            "personalizations": [{ "to": [{ "email": mail.to }] }],
            "from": { "email": from },
            "subject": mail.subject,
            "content": [{ "type": mail.content_type, "value": mail.content }],
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_mail(&self, mail: Mail) -> Result<u16, MailError> {
        if !self.enabled {
            tracing::info!(to = %mail.to, subject = %mail.subject, "SendGrid disabled, mail not sent");
            return Ok(202);
        }

        let resp = self
            .client
            .post(format!("{}/v3/mail/send", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&self.payload(&mail))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            tracing::info!(to = %mail.to, status = status.as_u16(), "Mail accepted");
            Ok(status.as_u16())
        } else {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(to = %mail.to, status = status.as_u16(), body = %body, "Mail rejected");
            Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

//! Facebook Graph API client

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Fields requested from `/me`
pub const PROFILE_FIELDS: &str = "id,first_name,last_name,email,picture";

/// Profile returned by `/me`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacebookProfile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub picture: Option<FacebookPicture>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacebookPicture {
    pub data: FacebookPictureData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FacebookPictureData {
    #[serde(default)]
    pub url: Option<String>,
}

impl FacebookProfile {
    pub fn picture_url(&self) -> Option<&str> {
        self.picture.as_ref()?.data.url.as_deref()
    }
}

#[derive(Debug, Error)]
pub enum FacebookError {
    /// The Graph API refused the access token
    #[error("facebook rejected the token: {0}")]
    Rejected(String),

    #[error("facebook request failed: {0}")]
    Transport(String),
}

/// Exchanges a Facebook access token for the user's profile
#[async_trait]
pub trait FacebookGraph: Send + Sync {
    async fn get_user(&self, access_token: &str) -> Result<FacebookProfile, FacebookError>;
}

pub struct GraphApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GraphApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FacebookGraph for GraphApiClient {
    async fn get_user(&self, access_token: &str) -> Result<FacebookProfile, FacebookError> {
        let resp = self
            .client
            .get(format!("{}/me", self.base_url))
            .query(&[("fields", PROFILE_FIELDS), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| FacebookError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Facebook rejected access token");
            return Err(FacebookError::Rejected(format!("status {}", status.as_u16())));
        }

        resp.json::<FacebookProfile>()
            .await
            .map_err(|e| FacebookError::Rejected(format!("unexpected profile payload: {e}")))
    }
}

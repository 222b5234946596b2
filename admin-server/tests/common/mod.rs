//! Shared integration test harness
//!
//! Builds the full application over a temporary RocksDB store, with mail
//! and Facebook replaced by in-process doubles.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use admin_server::auth::JwtService;
use admin_server::db::DbService;
use admin_server::db::models::{SalesChannel, SalesChannelDraft, User, UserDraft};
use admin_server::routes::build_app;
use admin_server::services::{
    FacebookError, FacebookGraph, FacebookProfile, Mail, MailError, Mailer,
};
use admin_server::{Config, ServerState};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::Role;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MANAGE: &str = "manage.example.com";
pub const PASSWORD: &str = "secret123";

/// Mailer double that records every message
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(&self, mail: Mail) -> Result<u16, MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(202)
    }
}

/// Facebook double: `valid-fb-token` resolves to the configured profile
pub struct StaticFacebook {
    pub profile: Mutex<FacebookProfile>,
}

pub const FB_TOKEN: &str = "valid-fb-token";

#[async_trait]
impl FacebookGraph for StaticFacebook {
    async fn get_user(&self, access_token: &str) -> Result<FacebookProfile, FacebookError> {
        if access_token == FB_TOKEN {
            Ok(self.profile.lock().unwrap().clone())
        } else {
            Err(FacebookError::Rejected("Invalid OAuth access token".into()))
        }
    }
}

/// Credentials attached to a test request
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Basic(&'a str, &'a str),
}

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub mailer: Arc<RecordingMailer>,
    pub facebook: Arc<StaticFacebook>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Test app whose configuration is adjusted by `configure` first
    pub async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("db");
        let mut config = Config::for_test(data_dir.to_string_lossy().to_string());
        configure(&mut config);
        let db = DbService::new(&config.data_dir, &config.db_namespace, &config.db_database)
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let facebook = Arc::new(StaticFacebook {
            profile: Mutex::new(FacebookProfile {
                id: "fb-100".into(),
                email: Some("fan@example.com".into()),
                first_name: Some("Face".into()),
                last_name: Some("Book".into()),
                picture: None,
            }),
        });

        let state = ServerState::new(config, db.db, mailer.clone(), facebook.clone());
        let app = build_app(&state);
        Self {
            app,
            state,
            mailer,
            facebook,
            _dir: dir,
        }
    }

    /// Send a request and return status plus JSON body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        host: &str,
        uri: &str,
        auth: Auth<'_>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("host", host);
        match auth {
            Auth::None => {}
            Auth::Bearer(token) => {
                builder = builder.header("authorization", format!("Bearer {token}"));
            }
            Auth::Basic(email, password) => {
                let encoded = STANDARD.encode(format!("{email}:{password}"));
                builder = builder.header("authorization", format!("Basic {encoded}"));
            }
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, host: &str, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, host, uri, Auth::Bearer(token), None)
            .await
    }

    pub async fn create_user(
        &self,
        email: &str,
        role: Role,
        sales_channel: Option<&SalesChannel>,
    ) -> User {
        let mut doc = json!({
            "email": email,
            "password": PASSWORD,
            "role": role,
            "profile": { "firstName": "Test", "lastName": email },
        });
        if let Some(channel) = sales_channel {
            doc["salesChannel"] = json!(channel.id.to_string());
        }
        let draft = UserDraft::from_json(&doc, true).unwrap();
        self.state.users().create(draft).await.unwrap()
    }

    pub async fn create_channel(&self, owner: &User, domain: &str) -> SalesChannel {
        let draft = SalesChannelDraft::from_json(&json!({
            "owner": owner.id.to_string(),
            "domain": domain,
            "name": format!("{domain} shop"),
            "type": "ecommerce",
        }))
        .unwrap();
        self.state.sales_channels().create(draft).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        let jwt: Arc<JwtService> = self.state.get_jwt_service();
        jwt.generate_token(&user.id.to_string()).unwrap()
    }
}

/// Field messages under `details.errors.<field>`
pub fn field_error<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    body.get("details")?.get("errors")?.get(field)
}

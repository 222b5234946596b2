//! Host-based tenancy and middleware stack

mod common;

use axum::body::Body;
use common::{Auth, MANAGE, TestApp};
use http::{Method, Request, StatusCode};
use shared::Role;
use tower::ServiceExt;

#[tokio::test]
async fn test_missing_host_is_rejected() {
    let t = TestApp::new().await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_health_reports_database() {
    let t = TestApp::new().await;
    let req = Request::builder()
        .uri("/health")
        .header("host", "manage.example.com:9000")
        .body(Body::empty())
        .unwrap();
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let (_, body) = t
        .request(Method::GET, MANAGE, "/health", Auth::None, None)
        .await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_customer_token_bound_to_its_storefront() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let shop = t.create_channel(&owner, "shop.example.com").await;
    t.create_channel(&owner, "other.example.com").await;
    let buyer = t
        .create_user("buyer@example.com", Role::Customer, Some(&shop))
        .await;
    let token = t.token_for(&buyer);

    // Authenticated on its own storefront (the role gate then refuses)
    let (status, _) = t.get("shop.example.com", "/users/me", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Unknown on any other domain
    let (status, _) = t.get("other.example.com", "/users/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = t.get(MANAGE, "/users/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_host_is_case_and_port_insensitive() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let token = t.token_for(&owner);

    let (status, _) = t.get("MANAGE.Example.com:8443", "/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
}

fn health_request(forwarded_proto: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/health").header("host", MANAGE);
    if let Some(proto) = forwarded_proto {
        builder = builder.header("x-forwarded-proto", proto);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_production_requires_forwarded_https() {
    let t = TestApp::with_config(|c| c.environment = "production".into()).await;

    let (status, body) = t.send(health_request(None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3004);

    let (status, body) = t.send(health_request(Some("http"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 3004);

    let (status, body) = t.send(health_request(Some("https"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "production");
}

#[tokio::test]
async fn test_development_allows_plain_http() {
    let t = TestApp::with_config(|c| c.environment = "development".into()).await;

    let (status, body) = t.send(health_request(None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "development");

    let (status, _) = t.send(health_request(Some("http"))).await;
    assert_eq!(status, StatusCode::OK);
}

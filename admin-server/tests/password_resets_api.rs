//! /password-resets API integration tests

mod common;

use axum::body::Body;
use common::{Auth, MANAGE, TestApp, field_error};
use http::{Method, Request, StatusCode};
use serde_json::json;
use shared::Role;

#[tokio::test]
async fn test_full_reset_flow() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/password-resets",
            Auth::None,
            Some(json!({"email": "Owner@Example.com", "link": "https://manage.example.com/reset/"})),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(body.is_null());

    let resets = t.state.password_resets().find_for_user(&owner.id).await.unwrap();
    assert_eq!(resets.len(), 1);
    let token = resets[0].token.clone();
    assert_eq!(token.len(), 32);

    let sent = t.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "owner@example.com");
    assert_eq!(sent[0].subject, "api - Password Reset");
    assert!(sent[0].content.contains("Hey, Test."));
    assert!(
        sent[0]
            .content
            .contains(&format!("https://manage.example.com/reset/{token}"))
    );

    let uri = format!("/password-resets/{token}");
    let (status, body) = t
        .request(Method::GET, MANAGE, &uri, Auth::None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], token);
    assert_eq!(body["user"]["email"], "owner@example.com");

    let (status, body) = t
        .request(Method::PUT, MANAGE, &uri, Auth::None, Some(json!({"password": "abc"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(field_error(&body, "password").is_some());

    let (status, body) = t
        .request(
            Method::PUT,
            MANAGE,
            &uri,
            Auth::None,
            Some(json!({"password": "fresh-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], owner.id.to_string());

    let (status, _) = t
        .request(
            Method::POST,
            MANAGE,
            "/auth",
            Auth::Basic("owner@example.com", "fresh-password"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Token consumed
    let (status, body) = t
        .request(Method::GET, MANAGE, &uri, Auth::None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_form_encoded_request_and_completion() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/password-resets")
        .header("host", MANAGE)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "email=owner%40example.com&link=https%3A%2F%2Fmanage.example.com%2Freset",
        ))
        .unwrap();
    let (status, _) = t.send(req).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let resets = t.state.password_resets().find_for_user(&owner.id).await.unwrap();
    assert_eq!(resets.len(), 1);

    let req = Request::builder()
        .method(Method::PUT)
        .uri(format!("/password-resets/{}", resets[0].token))
        .header("host", MANAGE)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("password=fresh-password"))
        .unwrap();
    let (status, body) = t.send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "owner@example.com");
}

#[tokio::test]
async fn test_completing_removes_every_reset_of_user() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let resets = t.state.password_resets();
    let first = resets.create(&owner.id, 3600).await.unwrap();
    let second = resets.create(&owner.id, 3600).await.unwrap();

    let (status, _) = t
        .request(
            Method::PUT,
            MANAGE,
            &format!("/password-resets/{}", second.token),
            Auth::None,
            Some(json!({"password": "fresh-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert!(resets.find_valid(&first.token).await.unwrap().is_none());
    assert!(resets.find_for_user(&owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_request_validates_payload() {
    let t = TestApp::new().await;
    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/password-resets",
            Auth::None,
            Some(json!({"email": "nope", "link": "ftp://example.com/reset"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(field_error(&body, "email").is_some());
    assert!(field_error(&body, "link").is_some());
    assert!(t.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_unknown_email_is_not_found() {
    let t = TestApp::new().await;
    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/password-resets",
            Auth::None,
            Some(json!({"email": "ghost@example.com", "link": "https://example.com/r"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_reset_lookup_is_tenant_scoped() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    t.create_user("buyer@example.com", Role::Customer, Some(&channel))
        .await;

    // Customers are invisible on the management domain
    let payload = json!({"email": "buyer@example.com", "link": "https://shop.example.com/reset"});
    let (status, _) = t
        .request(
            Method::POST,
            MANAGE,
            "/password-resets",
            Auth::None,
            Some(payload.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .request(
            Method::POST,
            "shop.example.com",
            "/password-resets",
            Auth::None,
            Some(payload),
        )
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // An admin's token cannot be redeemed on a storefront
    let reset = t
        .state
        .password_resets()
        .create(&owner.id, 3600)
        .await
        .unwrap();
    let (status, _) = t
        .request(
            Method::GET,
            "shop.example.com",
            &format!("/password-resets/{}", reset.token),
            Auth::None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_token_is_not_found_and_purged() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let resets = t.state.password_resets();
    let expired = resets.create(&owner.id, -1).await.unwrap();
    resets.create(&owner.id, 3600).await.unwrap();

    let (status, _) = t
        .request(
            Method::GET,
            MANAGE,
            &format!("/password-resets/{}", expired.token),
            Auth::None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(resets.purge_expired().await.unwrap(), 1);
    assert_eq!(resets.find_for_user(&owner.id).await.unwrap().len(), 1);
}

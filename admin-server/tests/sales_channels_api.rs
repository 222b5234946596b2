//! /sales-channels API integration tests

mod common;

use common::{Auth, MANAGE, TestApp, field_error};
use http::{Method, StatusCode};
use serde_json::json;
use shared::Role;

fn channel_payload(owner: &str, domain: &str) -> serde_json::Value {
    json!({
        "owner": owner,
        "domain": domain,
        "name": "Corner Shop",
        "type": "ecommerce",
        "siteData": {"theme": {"color": "red", "font": "serif"}},
    })
}

#[tokio::test]
async fn test_store_admin_creates_own_channel() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let token = t.token_for(&owner);

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload(&owner.id.to_string(), "Shop.Example.COM")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["domain"], "shop.example.com");
    assert_eq!(body["type"], "ecommerce");
    assert_eq!(body["owner"], owner.id.to_string());
    assert_eq!(body["siteData"]["theme"]["color"], "red");
}

#[tokio::test]
async fn test_store_admin_cannot_create_for_someone_else() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let other = t.create_user("other@example.com", Role::StoreAdmin, None).await;
    let token = t.token_for(&owner);

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload(&other.id.to_string(), "shop.example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    // Nothing persisted
    let found = t
        .state
        .sales_channels()
        .find_by_domain("shop.example.com")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_owner_must_be_store_admin() {
    let t = TestApp::new().await;
    let root = t.create_user("root@example.com", Role::SuperAdmin, None).await;
    let token = t.token_for(&root);

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload(&root.id.to_string(), "shop.example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5004);
    assert!(field_error(&body, "owner").is_some());

    let (status, _) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload("user:ghost", "shop.example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_validates_and_rejects_duplicate_domain() {
    let t = TestApp::new().await;
    let root = t.create_user("root@example.com", Role::SuperAdmin, None).await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    t.create_channel(&owner, "shop.example.com").await;
    let token = t.token_for(&root);

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(json!({"owner": owner.id.to_string(), "domain": "localhost", "type": "market"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["domain", "name", "type"] {
        assert!(field_error(&body, field).is_some(), "missing error for {field}");
    }

    let (status, body) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload(&owner.id.to_string(), "shop.example.com")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(field_error(&body, "domain").is_some());
}

#[tokio::test]
async fn test_list_is_scoped_to_owner() {
    let t = TestApp::new().await;
    let root = t.create_user("root@example.com", Role::SuperAdmin, None).await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let other = t.create_user("other@example.com", Role::StoreAdmin, None).await;
    t.create_channel(&owner, "a.example.com").await;
    t.create_channel(&owner, "b.example.com").await;
    t.create_channel(&other, "c.example.com").await;

    let (status, body) = t
        .get(MANAGE, "/sales-channels?sort=domain", &t.token_for(&owner))
        .await;
    assert_eq!(status, StatusCode::OK);
    let domains: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["domain"].as_str().unwrap())
        .collect();
    assert_eq!(domains, vec!["a.example.com", "b.example.com"]);

    let (_, body) = t.get(MANAGE, "/sales-channels", &t.token_for(&root)).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = t
        .get(MANAGE, "/sales-channels?q=C.EXAMPLE", &t.token_for(&root))
        .await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_requires_ownership() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let other = t.create_user("other@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    let uri = format!("/sales-channels/{}", channel.id);

    let (status, body) = t.get(MANAGE, &uri, &t.token_for(&owner)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], channel.id.to_string());

    let (status, _) = t.get(MANAGE, &uri, &t.token_for(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .get(MANAGE, "/sales-channels/sales_channel:none", &t.token_for(&owner))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5001);
}

#[tokio::test]
async fn test_update_deep_merges_blobs() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let token = t.token_for(&owner);

    let (_, created) = t
        .request(
            Method::POST,
            MANAGE,
            "/sales-channels",
            Auth::Bearer(&token),
            Some(channel_payload(&owner.id.to_string(), "shop.example.com")),
        )
        .await;
    let uri = format!("/sales-channels/{}", created["id"].as_str().unwrap());

    let (status, body) = t
        .request(
            Method::PUT,
            MANAGE,
            &uri,
            Auth::Bearer(&token),
            Some(json!({"name": "Renamed", "siteData": {"theme": {"color": "blue"}}})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["domain"], "shop.example.com");
    assert_eq!(body["siteData"]["theme"]["color"], "blue");
    assert_eq!(body["siteData"]["theme"]["font"], "serif");
}

#[tokio::test]
async fn test_type_is_immutable() {
    let t = TestApp::new().await;
    let root = t.create_user("root@example.com", Role::SuperAdmin, None).await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    let uri = format!("/sales-channels/{}", channel.id);

    let (status, body) = t
        .request(
            Method::PUT,
            MANAGE,
            &uri,
            Auth::Bearer(&t.token_for(&root)),
            Some(json!({"type": "marketplace"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 5003);
}

#[tokio::test]
async fn test_store_admin_cannot_transfer_ownership() {
    let t = TestApp::new().await;
    let root = t.create_user("root@example.com", Role::SuperAdmin, None).await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let other = t.create_user("other@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    let uri = format!("/sales-channels/{}", channel.id);
    let transfer = json!({"owner": other.id.to_string()});

    let (status, _) = t
        .request(
            Method::PUT,
            MANAGE,
            &uri,
            Auth::Bearer(&t.token_for(&owner)),
            Some(transfer.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t
        .request(
            Method::PUT,
            MANAGE,
            &uri,
            Auth::Bearer(&t.token_for(&root)),
            Some(transfer),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], other.id.to_string());
}

#[tokio::test]
async fn test_delete_channel() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let other = t.create_user("other@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    let uri = format!("/sales-channels/{}", channel.id);

    let (status, _) = t
        .request(Method::DELETE, MANAGE, &uri, Auth::Bearer(&t.token_for(&other)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .request(Method::DELETE, MANAGE, &uri, Auth::Bearer(&t.token_for(&owner)), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .request(Method::DELETE, MANAGE, &uri, Auth::Bearer(&t.token_for(&owner)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customers_cannot_reach_channels() {
    let t = TestApp::new().await;
    let owner = t.create_user("owner@example.com", Role::StoreAdmin, None).await;
    let channel = t.create_channel(&owner, "shop.example.com").await;
    let buyer = t
        .create_user("buyer@example.com", Role::Customer, Some(&channel))
        .await;

    let (status, _) = t
        .get("shop.example.com", "/sales-channels", &t.token_for(&buyer))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // We consider OK or SERVICE_UNAVAILABLE acceptable as a basic liveness check
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    let _body = res.json::<serde_json::Value>().await?;
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"].is_object());
    Ok(())
}

#[tokio::test]
async fn register_creates_account_with_profile_and_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let account = common::register_account(&client, &server.base_url).await?;
    assert!(!account.access.is_empty());
    assert!(!account.refresh.is_empty());

    // The registration response embeds the automatically created profile
    let res = client
        .get(format!("{}/api/profile", server.base_url))
        .bearer_auth(&account.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["email"], account.email.as_str());
    assert_eq!(body["data"]["verified"], false);
    assert_eq!(body["data"]["image"], "default.jpg");
    Ok(())
}

#[tokio::test]
async fn register_rejects_password_mismatch_without_creating_user() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let email = format!("mismatch-{}@example.com", uuid::Uuid::new_v4().simple());
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": email,
            "username": format!("user{}", &uuid::Uuid::new_v4().simple().to_string()[..10]),
            "password": "first-password",
            "password2": "second-password",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password2"].is_string());

    // Nothing was persisted: logging in with either password fails
    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "first-password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let account = common::register_account(&client, &server.base_url).await?;

    // Same email in a different case must still collide
    let res = client
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({
            "email": account.email.to_uppercase(),
            "username": format!("other{}", &uuid::Uuid::new_v4().simple().to_string()[..10]),
            "password": "test-password-123",
            "password2": "test-password-123",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_round_trip_and_wrong_password() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let account = common::register_account(&client, &server.base_url).await?;

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": account.email, "password": account.password }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["user"]["email"], account.email.as_str());
    assert!(body["data"]["tokens"]["access"].is_string());
    // The password hash must never appear in any representation
    assert!(body["data"]["user"].get("password_hash").is_none());

    let res = client
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": account.email, "password": "wrong-password-123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_token_claims() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let account = common::register_account(&client, &server.base_url).await?;

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&account.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["email"], account.email.as_str());
    assert_eq!(body["data"]["username"], account.username.as_str());
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in ["/api/tasks", "/api/profile", "/api/auth/whoami"] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );
    }

    // A refresh token must not authenticate a request either
    if common::db_available(server).await {
        let account = common::register_account(&client, &server.base_url).await?;
        let res = client
            .get(format!("{}/api/tasks", server.base_url))
            .bearer_auth(&account.refresh)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_and_revokes_previous_token() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let account = common::register_account(&client, &server.base_url).await?;

    // First exchange succeeds and returns a new pair
    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "refresh": account.refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let rotated_access = body["data"]["tokens"]["access"].as_str().unwrap().to_string();
    let rotated_refresh = body["data"]["tokens"]["refresh"].as_str().unwrap().to_string();
    assert_ne!(rotated_refresh, account.refresh);

    // The new access token works
    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&rotated_access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Replaying the revoked token yields 401, never a new credential
    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "refresh": account.refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The rotated token is still usable exactly once
    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "refresh": rotated_refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refresh_rejects_garbage_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/refresh", server.base_url))
        .json(&json!({ "refresh": "not-a-jwt" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

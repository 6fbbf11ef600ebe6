mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn profile_patch_updates_display_fields_only() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = Client::new();
    let account = common::register_account(&client, &server.base_url).await?;

    let res = client
        .patch(format!("{}/api/profile", server.base_url))
        .bearer_auth(&account.access)
        .json(&json!({
            "full_name": "Alice Example",
            "bio": "Keeps lists of lists",
            // verified is operator-only; sending it must have no effect
            "verified": true,
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["full_name"], "Alice Example");
    assert_eq!(body["data"]["bio"], "Keeps lists of lists");
    assert_eq!(body["data"]["verified"], false);

    // Partial update leaves untouched fields alone
    let res = client
        .patch(format!("{}/api/profile", server.base_url))
        .bearer_auth(&account.access)
        .json(&json!({ "bio": "Shorter bio" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["full_name"], "Alice Example");
    assert_eq!(body["data"]["bio"], "Shorter bio");
    Ok(())
}

#[tokio::test]
async fn profile_patch_rejects_oversized_bio() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = Client::new();
    let account = common::register_account(&client, &server.base_url).await?;

    let res = client
        .patch(format!("{}/api/profile", server.base_url))
        .bearer_auth(&account.access)
        .json(&json!({ "bio": "x".repeat(501) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert!(body["field_errors"]["bio"].is_string());
    Ok(())
}

#[tokio::test]
async fn admin_verify_requires_staff() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = Client::new();
    let account = common::register_account(&client, &server.base_url).await?;

    // Freshly registered users are not staff; they cannot verify anyone,
    // including themselves.
    let whoami: Value = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&account.access)
        .send()
        .await?
        .json()
        .await?;
    let user_id = whoami["data"]["id"].as_str().unwrap();

    let res = client
        .put(format!(
            "{}/api/admin/users/{}/verify",
            server.base_url, user_id
        ))
        .bearer_auth(&account.access)
        .json(&json!({ "verified": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn summary_and_statistics_count_per_status() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_available(server).await {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }
    let client = Client::new();
    let account = common::register_account(&client, &server.base_url).await?;

    for (title, status) in [
        ("one", "open"),
        ("two", "open"),
        ("three", "in_progress"),
        ("four", "done"),
        ("five", "cancelled"),
        ("six", "done"),
    ] {
        let res = client
            .post(format!("{}/api/tasks", server.base_url))
            .bearer_auth(&account.access)
            .json(&json!({ "title": title, "status": status }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/tasks/summary", server.base_url))
        .bearer_auth(&account.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["summary"]["open"], 2);
    assert_eq!(body["data"]["summary"]["in_progress"], 1);
    assert_eq!(body["data"]["summary"]["done"], 2);
    assert_eq!(body["data"]["summary"]["cancelled"], 1);

    // Recent list is capped at five, newest first
    let recent = body["data"]["recent_tasks"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["title"], "six");

    let res = client
        .get(format!("{}/api/tasks/statistics", server.base_url))
        .bearer_auth(&account.access)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["total_tasks"], 6);
    assert_eq!(body["data"]["open_tasks"], 2);
    assert_eq!(body["data"]["done_tasks"], 2);
    Ok(())
}

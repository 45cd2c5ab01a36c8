mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn register_returns_public_fields_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = common::register(&client, &server.base_url, "reg_rita", "pw123456").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["username"], "reg_rita");
    assert_eq!(body["email"], "reg_rita@example.com");
    assert_eq!(body["is_admin"], false);
    // The credential must never appear in any form
    assert!(body.get("password").is_none());
    assert!(body.get("hashed_password").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_username_and_email_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = common::register(&client, &server.base_url, "dup_dana", "pw123456").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = common::register(&client, &server.base_url, "dup_dana", "pw123456").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Username already registered");

    // Same email under a different username
    let res = client
        .post(format!("{}/register", server.base_url))
        .json(&serde_json::json!({
            "username": "dup_dana2",
            "email": "dup_dana@example.com",
            "password": "pw123456",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Email already registered");
    Ok(())
}

#[tokio::test]
async fn malformed_registration_reports_field_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/register", server.base_url))
        .json(&serde_json::json!({
            "username": "ab",
            "email": "not-an-email",
            "password": "pw",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["username", "email", "password"] {
        assert!(
            body["field_errors"].get(field).is_some(),
            "expected error for {field}: {body}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn login_issues_bearer_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = common::register(&client, &server.base_url, "login_lou", "pw123456").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/login", server.base_url))
        .form(&[("username", "login_lou"), ("password", "pw123456")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap_or("").is_empty());
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    common::register(&client, &server.base_url, "login_mia", "pw123456").await?;

    for (username, password) in [("login_mia", "wrong-pass"), ("login_nobody", "pw123456")] {
        let res = client
            .post(format!("{}/login", server.base_url))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = res.json::<Value>().await?;
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_or_bad_tokens() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No token at all
    let res = client
        .get(format!("{}/artists", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let res = client
        .get(format!("{}/artists", server.base_url))
        .bearer_auth("definitely.not.valid")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Wrong auth scheme
    let res = client
        .get(format!("{}/artists", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn register_rejects_invalid_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "email": "not-an-email", "password": "longenough" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["email"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/register", server.base_url))
        .json(&json!({ "email": "user@example.com", "password": "short" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_rejects_malformed_body() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": "user@example.com" }))
        .send()
        .await?;

    // Missing required field: axum's Json extractor rejects before the handler
    assert!(res.status().is_client_error(), "unexpected status: {}", res.status());
    Ok(())
}

#[tokio::test]
async fn refresh_rejects_garbage_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/refresh", server.base_url))
        .json(&json!({ "token": "definitely.not.jwt" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_route_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user/profile", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn protected_route_rejects_garbage_bearer() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user/profile", server.base_url))
        .bearer_auth("definitely.not.jwt")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_route_rejects_basic_auth_scheme() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/user/profile", server.base_url))
        .header("authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

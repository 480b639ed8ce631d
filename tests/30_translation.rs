mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn translation_create_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/translation", server.base_url))
        .json(&json!({ "text": "hello" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn translation_list_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/translation", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn translation_record_routes_require_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let id = "00000000-0000-0000-0000-000000000000";

    for url in [
        format!("{}/api/translation/{}", server.base_url, id),
        format!("{}/api/translation/history", server.base_url),
    ] {
        let res = client.get(&url).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "GET {}", url);
    }

    let res = client
        .put(format!("{}/api/translation/{}/favorite", server.base_url, id))
        .json(&json!({ "favorite": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .delete(format!("{}/api/translation/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

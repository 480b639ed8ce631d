mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Single test in this file: it configures strict auth limits for its server
/// (each test binary spawns its own instance) and would starve siblings.
#[tokio::test]
async fn login_gets_rate_limited() -> Result<()> {
    // The spawned server inherits these
    std::env::set_var("API_ENABLE_RATE_LIMITING", "true");
    std::env::set_var("API_AUTH_RATE_LIMIT_REQUESTS", "3");
    std::env::set_var("API_RATE_LIMIT_WINDOW_SECS", "60");

    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let mut saw_limited = false;
    for _ in 0..10 {
        let res = client
            .post(format!("{}/api/auth/login", server.base_url))
            .json(&json!({ "email": "probe@example.com", "password": "hunter2hunter2" }))
            .send()
            .await?;

        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            assert!(
                res.headers().contains_key(reqwest::header::RETRY_AFTER),
                "429 without Retry-After"
            );
            let body = res.json::<serde_json::Value>().await?;
            assert_eq!(body["code"], "TOO_MANY_REQUESTS");
            saw_limited = true;
            break;
        }
    }

    assert!(saw_limited, "auth endpoint never returned 429");
    Ok(())
}

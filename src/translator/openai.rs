use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::config::TranslatorConfig;
use crate::translator::{Backend, Completion, TranslatorError};

/// Client for an OpenAI-compatible chat-completions API
#[derive(Debug)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    /// Maximum number of retry attempts after the first request
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl OpenAi {
    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Backend for OpenAi {
    /// Send a chat-completion request with retry on rate-limit and transient
    /// failures. Client errors other than 429 fail immediately.
    async fn complete(&self, system: &str, user: &str) -> Result<Completion, TranslatorError> {
        let url = self.api_url();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut attempt = 0;
        let mut last_error: Option<TranslatorError> = None;
        let mut server_hint: Option<Duration> = None;

        while attempt <= self.max_retries {
            let response_result = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<ChatResponse>()
                            .await
                            .map_err(|e| TranslatorError::Parse(e.to_string()))?;
                        return Ok(extract_completion(parsed));
                    }

                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        let body = error_body(response).await;
                        error!("Translation API auth error ({}): {}", status, body);
                        return Err(TranslatorError::Auth(body));
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        server_hint = retry_after(response.headers());
                        let body = error_body(response).await;
                        warn!(
                            "Translation API rate limited - attempt {}/{}",
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(TranslatorError::RateLimited(body));
                    } else if should_retry_status(status) {
                        let body = error_body(response).await;
                        error!(
                            "Translation API error ({}): {} - attempt {}/{}",
                            status,
                            body,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(TranslatorError::Api {
                            status: status.as_u16(),
                            message: body,
                        });
                    } else {
                        // Client error - don't retry
                        let body = error_body(response).await;
                        error!("Translation API error ({}): {}", status, body);
                        return Err(TranslatorError::Api {
                            status: status.as_u16(),
                            message: body,
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "Translation API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(TranslatorError::RequestFailed(e.to_string()));
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let delay = server_hint
                    .take()
                    .unwrap_or_else(|| backoff_delay(attempt, self.backoff_base_ms));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TranslatorError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

fn extract_completion(response: ChatResponse) -> Completion {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    let (prompt_tokens, completion_tokens) = match response.usage {
        Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
        None => (None, None),
    };

    Completion {
        text,
        prompt_tokens,
        completion_tokens,
    }
}

/// 429 and server errors are worth retrying; other client errors are not
fn should_retry_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Exponential backoff: base, 2x base, 4x base, ... for attempt 1, 2, 3, ...
fn backoff_delay(attempt: u32, base_ms: u64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(1u64 << exponent))
}

/// Honor a Retry-After header expressed in seconds, if the server sent one
fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classifier() {
        assert!(should_retry_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(should_retry_status(StatusCode::BAD_GATEWAY));
        assert!(!should_retry_status(StatusCode::BAD_REQUEST));
        assert!(!should_retry_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1, 500), Duration::from_millis(500));
        assert_eq!(backoff_delay(2, 500), Duration::from_millis(1000));
        assert_eq!(backoff_delay(3, 500), Duration::from_millis(2000));
    }

    #[test]
    fn retry_after_parses_seconds() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "2".parse().unwrap());
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(reqwest::header::RETRY_AFTER, "soon".parse().unwrap());
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn completion_extraction() {
        let response: ChatResponse = serde_json::from_str(
            r#"{
                "choices": [{"message": {"role": "assistant", "content": "Bonjour"}}],
                "usage": {"prompt_tokens": 21, "completion_tokens": 3}
            }"#,
        )
        .unwrap();

        let completion = extract_completion(response);
        assert_eq!(completion.text, "Bonjour");
        assert_eq!(completion.prompt_tokens, Some(21));
        assert_eq!(completion.completion_tokens, Some(3));
    }

    #[test]
    fn empty_choices_yield_empty_text() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        let completion = extract_completion(response);
        assert!(completion.text.is_empty());
        assert_eq!(completion.prompt_tokens, None);
    }
}

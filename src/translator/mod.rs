/*!
 * Upstream translation provider wrapper.
 *
 * `Backend` abstracts the chat-completion provider so the service can be
 * exercised against a mock; `OpenAi` is the production implementation with
 * bounded retries and exponential backoff.
 */

use async_trait::async_trait;
use std::sync::OnceLock;
use thiserror::Error;

use crate::config;
use crate::types::Tone;

pub mod openai;
pub mod prompts;

pub use openai::OpenAi;

/// Errors from the upstream translation provider
#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("API responded with error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

/// Raw completion returned by a backend
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

/// A chat-completion provider
#[async_trait]
pub trait Backend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<Completion, TranslatorError>;
}

#[derive(Debug, Clone)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source_language: &'a str,
    pub target_language: &'a str,
    pub tone: Tone,
}

#[derive(Debug, Clone)]
pub struct Translated {
    pub text: String,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

/// Tone-aware translation service over a completion backend
pub struct Translator {
    backend: Box<dyn Backend>,
}

impl Translator {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn from_config() -> Self {
        Self::new(Box::new(OpenAi::from_config(&config::config().translator)))
    }

    pub async fn translate(
        &self,
        request: TranslationRequest<'_>,
    ) -> Result<Translated, TranslatorError> {
        let system = prompts::system_prompt(
            request.tone,
            request.source_language,
            request.target_language,
        );

        let completion = self.backend.complete(&system, request.text).await?;

        let text = completion.text.trim();
        if text.is_empty() {
            return Err(TranslatorError::EmptyCompletion);
        }

        Ok(Translated {
            text: text.to_string(),
            prompt_tokens: completion.prompt_tokens,
            completion_tokens: completion.completion_tokens,
        })
    }
}

/// Shared service instance built from configuration
pub fn shared() -> &'static Translator {
    static INSTANCE: OnceLock<Translator> = OnceLock::new();
    INSTANCE.get_or_init(Translator::from_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Backend stub that records the prompts it receives
    struct MockBackend {
        response: Result<String, fn() -> TranslatorError>,
        seen_system: Arc<Mutex<Option<String>>>,
    }

    impl MockBackend {
        fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                seen_system: Arc::new(Mutex::new(None)),
            }
        }

        fn failing(err: fn() -> TranslatorError) -> Self {
            Self {
                response: Err(err),
                seen_system: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl Backend for MockBackend {
        async fn complete(&self, system: &str, _user: &str) -> Result<Completion, TranslatorError> {
            *self.seen_system.lock().unwrap() = Some(system.to_string());
            match &self.response {
                Ok(text) => Ok(Completion {
                    text: text.clone(),
                    prompt_tokens: Some(10),
                    completion_tokens: Some(5),
                }),
                Err(make) => Err(make()),
            }
        }
    }

    fn request(tone: Tone) -> TranslationRequest<'static> {
        TranslationRequest {
            text: "hello there",
            source_language: "en",
            target_language: "ja",
            tone,
        }
    }

    #[tokio::test]
    async fn translate_trims_the_completion() {
        let translator = Translator::new(Box::new(MockBackend::replying("  こんにちは \n")));
        let out = translator.translate(request(Tone::Natural)).await.unwrap();
        assert_eq!(out.text, "こんにちは");
        assert_eq!(out.completion_tokens, Some(5));
    }

    #[tokio::test]
    async fn whitespace_only_completion_is_an_error() {
        let translator = Translator::new(Box::new(MockBackend::replying("   \n ")));
        let err = translator.translate(request(Tone::Natural)).await.unwrap_err();
        assert!(matches!(err, TranslatorError::EmptyCompletion));
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let translator = Translator::new(Box::new(MockBackend::failing(|| {
            TranslatorError::RateLimited("429".to_string())
        })));
        let err = translator.translate(request(Tone::Natural)).await.unwrap_err();
        assert!(matches!(err, TranslatorError::RateLimited(_)));
    }

    #[tokio::test]
    async fn tone_reaches_the_system_prompt() {
        let backend = MockBackend::replying("ok");
        let seen = backend.seen_system.clone();
        let translator = Translator::new(Box::new(backend));
        translator.translate(request(Tone::Angry)).await.unwrap();

        let prompt = seen.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, prompts::system_prompt(Tone::Angry, "en", "ja"));
        assert!(prompt.contains("irritated"));
    }
}

use axum::{extract::Extension, response::Json};
use serde::Deserialize;

use super::{log_history, normalize_tags, request_fingerprint, MAX_TEXT_LENGTH};
use crate::auth;
use crate::database::models::Translation;
use crate::database::repository::{NewTranslation, TranslationRepository};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::translator::{self, TranslationRequest};
use crate::types::{HistoryAction, Tone};

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub text: String,
    /// Defaults to the account's default target language
    pub target_language: Option<String>,
    /// Defaults to auto-detection
    pub source_language: Option<String>,
    /// Defaults to the account's preferred tone
    pub tone: Option<Tone>,
    pub tags: Option<Vec<String>>,
}

/// POST /api/translation - Translate text and store the result
///
/// An identical earlier request (same text, languages and tone) is answered
/// from storage with 200; a fresh translation is persisted and answered
/// with 201.
pub async fn translation_create(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateRequest>,
) -> ApiResult<Translation> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::field_validation("text", "Text cannot be empty"));
    }
    if text.len() > MAX_TEXT_LENGTH {
        return Err(ApiError::field_validation(
            "text",
            format!("Text must be at most {} characters", MAX_TEXT_LENGTH),
        ));
    }

    let target_language = match payload.target_language.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            auth::validate_language_code(code)
                .map_err(|msg| ApiError::field_validation("target_language", msg))?;
            code.to_string()
        }
        _ => user.default_target_language.clone(),
    };

    let source_language = match payload.source_language.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() && code != translator::prompts::AUTO_SOURCE => {
            auth::validate_language_code(code)
                .map_err(|msg| ApiError::field_validation("source_language", msg))?;
            code.to_string()
        }
        _ => translator::prompts::AUTO_SOURCE.to_string(),
    };

    let tone = payload.tone.unwrap_or(user.preferred_tone);
    let tags = normalize_tags(payload.tags.unwrap_or_default())?;

    let pool = DatabaseManager::pool().await?;
    let repo = TranslationRepository::new(pool.clone());

    let fingerprint = request_fingerprint(text, &source_language, &target_language, tone);
    if let Some(existing) = repo.find_by_hash(user.id, &fingerprint).await? {
        tracing::debug!("Reusing translation {} for identical request", existing.id);
        log_history(pool, user.id, existing.id, HistoryAction::Viewed).await;
        return Ok(ApiResponse::success(existing));
    }

    let translated = translator::shared()
        .translate(TranslationRequest {
            text,
            source_language: &source_language,
            target_language: &target_language,
            tone,
        })
        .await?;

    tracing::debug!(
        "Upstream usage: prompt_tokens={:?} completion_tokens={:?}",
        translated.prompt_tokens,
        translated.completion_tokens
    );

    let translation = repo
        .insert(NewTranslation {
            user_id: user.id,
            source_text: text,
            translated_text: &translated.text,
            source_language: &source_language,
            target_language: &target_language,
            tone,
            source_hash: &fingerprint,
            tags: &tags,
        })
        .await?;

    tracing::info!(
        "Created translation {} ({} -> {}, {})",
        translation.id,
        source_language,
        target_language,
        tone
    );

    log_history(pool, user.id, translation.id, HistoryAction::Created).await;

    Ok(ApiResponse::created(translation))
}

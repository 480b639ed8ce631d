use axum::{extract::Extension, response::Json};
use serde::Deserialize;

use crate::auth;
use crate::database::models::UserProfile;
use crate::database::repository::UserRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::types::Tone;

#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    pub preferred_tone: Option<Tone>,
    pub default_target_language: Option<String>,
}

/// PUT /api/user/preferences - Update translation defaults
///
/// Only the provided fields change; at least one must be present.
pub async fn preferences_update(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PreferencesRequest>,
) -> ApiResult<UserProfile> {
    if payload.preferred_tone.is_none() && payload.default_target_language.is_none() {
        return Err(ApiError::bad_request(
            "Provide preferred_tone and/or default_target_language",
        ));
    }

    let language = match payload.default_target_language.as_deref().map(str::trim) {
        Some(code) => {
            auth::validate_language_code(code)
                .map_err(|msg| ApiError::field_validation("default_target_language", msg))?;
            Some(code.to_string())
        }
        None => None,
    };

    let pool = DatabaseManager::pool().await?;
    let updated = UserRepository::new(pool)
        .update_preferences(user.id, payload.preferred_tone, language.as_deref())
        .await?
        .ok_or_else(|| ApiError::forbidden("User account is not active"))?;

    Ok(ApiResponse::success(UserProfile::from(&updated)))
}

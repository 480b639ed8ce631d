use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::log_history;
use crate::database::models::Translation;
use crate::database::repository::TranslationRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::types::HistoryAction;

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub favorite: bool,
}

/// PUT /api/translation/:id/favorite - Set the favorite flag
///
/// Idempotent: setting the flag to its current value is a no-op and records
/// no history entry.
pub async fn favorite_put(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FavoriteRequest>,
) -> ApiResult<Translation> {
    let pool = DatabaseManager::pool().await?;
    let repo = TranslationRepository::new(pool.clone());

    let current = repo
        .find_by_id(user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found"))?;

    if current.favorite == payload.favorite {
        return Ok(ApiResponse::success(current));
    }

    let updated = repo
        .update_favorite(user.id, id, payload.favorite)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found"))?;

    let action = if payload.favorite {
        HistoryAction::Favorited
    } else {
        HistoryAction::Unfavorited
    };
    log_history(pool, user.id, updated.id, action).await;

    Ok(ApiResponse::success(updated))
}

use axum::extract::{Extension, Path};
use uuid::Uuid;

use super::log_history;
use crate::database::models::Translation;
use crate::database::repository::TranslationRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::types::HistoryAction;

/// GET /api/translation/:id - Fetch a single translation
///
/// Fetches are recorded in the access log. Records owned by other users are
/// indistinguishable from missing ones.
pub async fn translation_get(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Translation> {
    let pool = DatabaseManager::pool().await?;
    let translation = TranslationRepository::new(pool.clone())
        .find_by_id(user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found"))?;

    log_history(pool, user.id, translation.id, HistoryAction::Viewed).await;

    Ok(ApiResponse::success(translation))
}

/// DELETE /api/translation/:id - Soft-delete a translation
pub async fn translation_delete(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let deleted = TranslationRepository::new(pool.clone())
        .soft_delete(user.id, id)
        .await?;

    if !deleted {
        return Err(ApiError::not_found("Translation not found"));
    }

    log_history(pool, user.id, id, HistoryAction::Deleted).await;

    Ok(ApiResponse::<()>::no_content())
}

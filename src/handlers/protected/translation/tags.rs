use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::normalize_tags;
use crate::database::models::Translation;
use crate::database::repository::TranslationRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    pub tags: Vec<String>,
}

/// PUT /api/translation/:id/tags - Replace the tag set on a translation
pub async fn tags_put(
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TagsRequest>,
) -> ApiResult<Translation> {
    let tags = normalize_tags(payload.tags)?;

    let pool = DatabaseManager::pool().await?;
    let updated = TranslationRepository::new(pool)
        .replace_tags(user.id, id, &tags)
        .await?
        .ok_or_else(|| ApiError::not_found("Translation not found"))?;

    Ok(ApiResponse::success(updated))
}

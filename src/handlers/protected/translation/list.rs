use axum::extract::{Extension, Query};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::repository::{TranslationFilter, TranslationRepository};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::types::{Pagination, Tone};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub favorite: Option<bool>,
    pub tag: Option<String>,
    pub tone: Option<Tone>,
    /// Free-text search against source and translated text
    pub q: Option<String>,
}

/// GET /api/translation - List stored translations, newest first
pub async fn translation_list(
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Value> {
    let page = Pagination {
        page: query.page,
        per_page: query.per_page,
    };

    let filter = TranslationFilter {
        favorite: query.favorite,
        tag: query.tag.filter(|t| !t.trim().is_empty()),
        tone: query.tone,
        q: query.q.filter(|q| !q.trim().is_empty()),
    };

    let pool = DatabaseManager::pool().await?;
    let (items, total) = TranslationRepository::new(pool)
        .list(user.id, &filter, page)
        .await?;

    Ok(ApiResponse::success(json!({
        "items": items,
        "page": page.page(),
        "per_page": page.per_page(),
        "total": total,
    })))
}

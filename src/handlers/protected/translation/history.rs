use axum::extract::{Extension, Query};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::repository::HistoryRepository;
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::types::Pagination;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/translation/history - Access log for the current user, newest first
pub async fn history_list(
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Value> {
    let page = Pagination {
        page: query.page,
        per_page: query.per_page,
    };

    let pool = DatabaseManager::pool().await?;
    let (items, total) = HistoryRepository::new(pool).list(user.id, page).await?;

    Ok(ApiResponse::success(json!({
        "items": items,
        "page": page.page(),
        "per_page": page.per_page(),
        "total": total,
    })))
}

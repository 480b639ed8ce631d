use axum::response::Json;
use serde::Deserialize;
use serde_json::Value;

use super::token_response;
use crate::auth;
use crate::database::repository::UserRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub token: String,
}

/// POST /api/auth/refresh - Exchange a (possibly expired) token for a new one
///
/// The signature must verify and the expiry must fall inside the refresh
/// window; the account must still be active.
pub async fn refresh(Json(payload): Json<RefreshRequest>) -> ApiResult<Value> {
    let claims = auth::decode_for_refresh(&payload.token)?;

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool).find_by_id(claims.sub).await?;

    let user = match user {
        Some(user) => user,
        None => return Err(ApiError::forbidden("User account is not active")),
    };

    if user.email != claims.email {
        return Err(ApiError::forbidden("User authentication mismatch"));
    }

    Ok(ApiResponse::success(token_response(&user)?))
}

use axum::{extract::Extension, response::Json};
use serde::Deserialize;

use crate::auth;
use crate::database::models::UserProfile;
use crate::database::repository::UserRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
}

/// GET /api/user/profile - Current account details
pub async fn profile_get(Extension(user): Extension<CurrentUser>) -> ApiResult<UserProfile> {
    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool)
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("User account is not active"))?;

    Ok(ApiResponse::success(UserProfile::from(&user)))
}

/// PUT /api/user/profile - Update the display name
pub async fn profile_update(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> ApiResult<UserProfile> {
    let name = payload.name.trim();
    auth::validate_display_name(name).map_err(|msg| ApiError::field_validation("name", msg))?;

    let pool = DatabaseManager::pool().await?;
    let updated = UserRepository::new(pool)
        .update_name(user.id, name)
        .await?
        .ok_or_else(|| ApiError::forbidden("User account is not active"))?;

    Ok(ApiResponse::success(UserProfile::from(&updated)))
}

/// DELETE /api/user - Soft-delete the account
///
/// Outstanding tokens keep verifying cryptographically but fail account
/// validation from the next request on.
pub async fn user_delete(Extension(user): Extension<CurrentUser>) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    let deleted = UserRepository::new(pool).soft_delete(user.id).await?;

    if !deleted {
        return Err(ApiError::forbidden("User account is not active"));
    }

    tracing::info!("Deleted account {}", user.id);

    Ok(ApiResponse::<()>::no_content())
}

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use super::auth::AuthUser;
use crate::database::repository::UserRepository;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::types::Tone;

/// User context loaded from the database for the authenticated request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub preferred_tone: Tone,
    pub default_target_language: String,
}

/// Middleware that validates the user from JWT claims against the users table.
/// Ensures the account still exists and has not been deleted.
pub async fn validate_user_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool).find_by_id(auth_user.user_id).await?;

    let user = user.ok_or_else(|| {
        tracing::warn!(
            "User validation failed: '{}' (ID: {}) not found or deleted",
            auth_user.email,
            auth_user.user_id
        );
        ApiError::forbidden("User account is not active")
    })?;

    // A stale token issued before an email change is rejected
    if user.email != auth_user.email {
        tracing::warn!(
            "User validation failed: JWT email '{}' doesn't match account email",
            auth_user.email
        );
        return Err(ApiError::forbidden("User authentication mismatch"));
    }

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        name: user.name,
        preferred_tone: user.preferred_tone,
        default_target_language: user.default_target_language,
    });

    Ok(next.run(request).await)
}

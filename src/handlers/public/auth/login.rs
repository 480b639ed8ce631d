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
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - Authenticate and receive a JWT token
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// cannot be used to probe which addresses have accounts.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool).find_by_email(&email).await?;

    let user = match user {
        Some(user) => user,
        None => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    if !auth::verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!("Failed login attempt for {}", user.id);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    Ok(ApiResponse::success(token_response(&user)?))
}

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
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

/// POST /api/auth/register - Create a new account
///
/// Validates the payload before any I/O, stores a bcrypt hash of the
/// password, and returns a token so the client is logged in immediately.
/// A duplicate email yields 409.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    let email = payload.email.trim().to_lowercase();
    auth::validate_email(&email).map_err(|msg| ApiError::field_validation("email", msg))?;
    auth::validate_password(&payload.password)
        .map_err(|msg| ApiError::field_validation("password", msg))?;

    // Display name defaults to the mailbox part of the address
    let name = match payload.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => {
            auth::validate_display_name(name).map_err(|msg| ApiError::field_validation("name", msg))?;
            name.to_string()
        }
        _ => email.split('@').next().unwrap_or("user").to_string(),
    };

    let password_hash = auth::hash_password(&payload.password)?;

    let pool = DatabaseManager::pool().await?;
    let user = UserRepository::new(pool)
        .insert(&email, &name, &password_hash)
        .await?;

    tracing::info!("Registered account {}", user.id);

    Ok(ApiResponse::created(token_response(&user)?))
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// How long after expiry a token may still be exchanged for a fresh one
pub const MAX_REFRESH_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    Encode(String),
    #[error("{0}")]
    Invalid(String),
    #[error("token expired outside the refresh window")]
    RefreshWindowExpired,
}

fn secret() -> Result<&'static str, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }
    Ok(secret)
}

pub fn generate_token(claims: &Claims) -> Result<String, JwtError> {
    let encoding_key = EncodingKey::from_secret(secret()?.as_bytes());

    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::Encode(e.to_string()))
}

/// Validate a token (signature + expiry) and extract its claims
pub fn decode_token(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

/// Validate a token for refresh: the signature must verify, but an expired
/// token is accepted as long as it expired within the refresh window.
pub fn decode_for_refresh(token: &str) -> Result<Claims, JwtError> {
    let decoding_key = DecodingKey::from_secret(secret()?.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    let oldest_accepted = (Utc::now() - Duration::days(MAX_REFRESH_WINDOW_DAYS)).timestamp();
    if token_data.claims.exp < oldest_accepted {
        return Err(JwtError::RefreshWindowExpired);
    }

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, config::config().security.bcrypt_cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// Basic shape check; real deliverability is the mail system's problem
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long".to_string());
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.len() > 128 {
        return Err("Password is too long".to_string());
    }

    Ok(())
}

/// Accepts BCP 47-ish codes like "en", "ja", "pt-BR"
pub fn validate_language_code(code: &str) -> Result<(), String> {
    if code.len() < 2 || code.len() > 16 {
        return Err("Language code must be 2-16 characters".to_string());
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err("Language code can only contain letters, numbers, and hyphen".to_string());
    }

    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 80 {
        return Err("Name must be less than 80 characters".to_string());
    }

    Ok(())
}

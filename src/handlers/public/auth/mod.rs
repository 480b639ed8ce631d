mod login;
mod refresh;
mod register;

pub use login::login;
pub use refresh::refresh;
pub use register::register;

use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::{User, UserProfile};
use crate::error::ApiError;

/// Standard token response body shared by register/login/refresh
pub(crate) fn token_response(user: &User) -> Result<Value, ApiError> {
    let claims = Claims::new(user.id, user.email.clone());
    let token = auth::generate_token(&claims)?;

    Ok(json!({
        "token": token,
        "user": UserProfile::from(user),
        "expires_in": config::config().security.jwt_expiry_hours * 3600,
    }))
}

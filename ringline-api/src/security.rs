use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::error::AppError;
use crate::middleware::auth::{AdminClaims, UserClaims};
use crate::state::AuthConfig;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Ошибка сервера: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::InternalServerError(format!("Ошибка сервера: {}", e)))
}

fn expiry(auth: &AuthConfig) -> usize {
    (Utc::now() + Duration::seconds(auth.expiration as i64)).timestamp() as usize
}

pub fn issue_user_token(
    id: i64,
    email: &str,
    full_name: &str,
    auth: &AuthConfig,
) -> Result<String, AppError> {
    let claims = UserClaims {
        id,
        email: email.to_string(),
        full_name: full_name.to_string(),
        exp: expiry(auth),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

pub fn issue_admin_token(id: i64, username: &str, auth: &AuthConfig) -> Result<String, AppError> {
    let claims = AdminClaims {
        id,
        username: username.to_string(),
        is_admin: true,
        exp: expiry(auth),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

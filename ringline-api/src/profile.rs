use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{store_error, AppError};
use crate::middleware::auth::{user_auth_middleware, UserClaims};
use crate::security;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/user/profile", get(get_profile).put(update_profile))
        .route("/api/user/password", put(change_password))
        .route_layer(from_fn_with_state(state, user_auth_middleware))
}

async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_id(claims.id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::NotFoundError("Пользователь не найден".to_string()))?;

    Ok(Json(json!({
        "id": user.id,
        "email": user.email,
        "full_name": user.full_name,
        "phone": user.phone,
        "passport": user.passport,
    })))
}

#[derive(Debug, Deserialize)]
struct UpdateProfileRequest {
    full_name: String,
    email: String,
    phone: String,
    passport: String,
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .users
        .update_profile(claims.id, &req.full_name, &req.email, &req.phone, &req.passport)
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Профиль обновлен",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_id(claims.id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::NotFoundError("Пользователь не найден".to_string()))?;

    if !security::verify_password(&req.current_password, &user.password)? {
        return Err(AppError::ValidationError(
            "Неверный текущий пароль".to_string(),
        ));
    }

    let password_hash = security::hash_password(&req.new_password)?;
    state
        .users
        .update_password(claims.id, &password_hash)
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Пароль изменен",
    })))
}

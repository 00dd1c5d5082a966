use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::{store_error, AppError};
use crate::security;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/admin/login", post(admin_login))
        .route("/api/check-user", post(check_user))
        .route("/api/reset-password", post(reset_password))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    passport: Option<String>,
    password: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let (full_name, email, phone, passport, password) = match (
        req.full_name.filter(|s| !s.is_empty()),
        req.email.filter(|s| !s.is_empty()),
        req.phone.filter(|s| !s.is_empty()),
        req.passport.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) {
        (Some(a), Some(b), Some(c), Some(d), Some(e)) => (a, b, c, d, e),
        _ => {
            return Err(AppError::ValidationError(
                "Все поля обязательны".to_string(),
            ))
        }
    };

    let existing = state
        .users
        .find_by_email(&email)
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err(AppError::ConflictError(
            "Пользователь с таким email уже существует".to_string(),
        ));
    }

    let password_hash = security::hash_password(&password)?;
    let id = state
        .users
        .create(&full_name, &email, &phone, &passport, &password_hash)
        .await
        .map_err(store_error)?;

    let token = security::issue_user_token(id, &email, &full_name, &state.auth)?;

    info!(user_id = id, "user registered");

    Ok(Json(json!({
        "success": true,
        "message": "Регистрация успешна",
        "token": token,
        "user": {
            "id": id,
            "email": email,
            "full_name": full_name,
            "phone": phone,
            "passport": passport,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::ValidationError("Пользователь не найден".to_string()))?;

    if !security::verify_password(&req.password, &user.password)? {
        return Err(AppError::ValidationError("Неверный пароль".to_string()));
    }

    let token = security::issue_user_token(user.id, &user.email, &user.full_name, &state.auth)?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "full_name": user.full_name,
            "phone": user.phone,
            "passport": user.passport,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct AdminLoginRequest {
    username: Option<String>,
    password: Option<String>,
}

async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let (username, password) = match (
        req.username.filter(|s| !s.is_empty()),
        req.password.filter(|s| !s.is_empty()),
    ) {
        (Some(u), Some(p)) => (u, p),
        _ => return Err(AppError::ValidationError("Заполните все поля".to_string())),
    };

    let admin = state
        .admins
        .find_by_username(&username)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::ValidationError("Администратор не найден".to_string()))?;

    // Admin credentials are bcrypt-hashed, same as user ones.
    if !security::verify_password(&password, &admin.password)? {
        return Err(AppError::ValidationError("Неверный пароль".to_string()));
    }

    let token = security::issue_admin_token(admin.id, &admin.username, &state.auth)?;

    info!(admin_id = admin.id, "admin logged in");

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": {
            "id": admin.id,
            "username": admin.username,
            "isAdmin": true,
        },
    })))
}

#[derive(Debug, Deserialize)]
struct CheckUserRequest {
    contact: Option<String>,
}

/// Password recovery, step 1: does this email or phone belong to anyone?
async fn check_user(
    State(state): State<AppState>,
    Json(req): Json<CheckUserRequest>,
) -> Result<Json<Value>, AppError> {
    let contact = req
        .contact
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::ValidationError("Введите email или телефон".to_string()))?;

    let user = state
        .users
        .find_by_contact(&contact)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::ValidationError("Пользователь не найден".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "message": "Пользователь найден",
        "email": user.email,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest {
    contact: Option<String>,
    new_password: Option<String>,
}

/// Password recovery, step 2: set the new password for the matched contact.
async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let (contact, new_password) = match (
        req.contact.filter(|s| !s.is_empty()),
        req.new_password.filter(|s| !s.is_empty()),
    ) {
        (Some(c), Some(p)) => (c, p),
        _ => {
            return Err(AppError::ValidationError(
                "Все поля обязательны".to_string(),
            ))
        }
    };

    let password_hash = security::hash_password(&new_password)?;
    let updated = state
        .users
        .reset_password_by_contact(&contact, &password_hash)
        .await
        .map_err(store_error)?;

    if updated == 0 {
        return Err(AppError::ValidationError(
            "Пользователь не найден".to_string(),
        ));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Пароль успешно изменен",
    })))
}

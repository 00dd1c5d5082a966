use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use ringline_catalog::ReviewRuleError;
use ringline_order::OrderError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    /// Duplicate email or review. Answered with 400, the status the clients
    /// expect for these cases.
    ConflictError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ошибка сервера".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::TourNotFound => AppError::NotFoundError(err.to_string()),
            OrderError::InsufficientSeats => AppError::ValidationError(err.to_string()),
            OrderError::Store(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl From<ReviewRuleError> for AppError {
    fn from(err: ReviewRuleError) -> Self {
        match err {
            ReviewRuleError::InvalidRating => AppError::ValidationError(err.to_string()),
            ReviewRuleError::AlreadyReviewed => AppError::ConflictError(err.to_string()),
            ReviewRuleError::NotOwnerEdit | ReviewRuleError::NotOwnerDelete => {
                AppError::AuthorizationError(err.to_string())
            }
        }
    }
}

/// Store failures surface as the catch-all server error the clients show.
pub fn store_error(err: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    tracing::error!("store error: {}", err);
    AppError::InternalServerError("Ошибка сервера".to_string())
}

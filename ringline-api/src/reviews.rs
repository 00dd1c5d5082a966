use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use ringline_catalog::{validate_rating, ReviewRuleError};
use ringline_core::models::ReviewWithAuthor;

use crate::error::{store_error, AppError};
use crate::middleware::auth::{bearer_token, decode_user_claims, UserClaims};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tours/{id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route(
            "/api/tours/{id}/reviews/{review_id}",
            put(update_review).delete(delete_review),
        )
}

/// The write endpoints verify the token themselves so the GET on the same
/// path can stay public.
fn require_user(headers: &HeaderMap, state: &AppState) -> Result<UserClaims, AppError> {
    decode_user_claims(bearer_token(headers)?, &state.auth.secret)
}

#[derive(Debug, Deserialize)]
struct ReviewBody {
    rating: i32,
    comment: Option<String>,
}

/// Token optional: with a valid one the caller's own review is split out as
/// `userReview`; a broken token is simply ignored.
async fn list_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let caller = bearer_token(&headers)
        .ok()
        .and_then(|token| decode_user_claims(token, &state.auth.secret).ok());

    let user_review = match &caller {
        Some(claims) => state
            .reviews
            .find_for_user(tour_id, claims.id)
            .await
            .map_err(store_error)?,
        None => None,
    };

    let reviews: Vec<ReviewWithAuthor> = state
        .reviews
        .list_for_tour(tour_id)
        .await
        .map_err(store_error)?
        .into_iter()
        .filter(|r| user_review.as_ref().map_or(true, |own| r.review.id != own.id))
        .collect();

    Ok(Json(json!({
        "reviews": reviews,
        "userReview": user_review,
    })))
}

async fn create_review(
    State(state): State<AppState>,
    Path(tour_id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<Json<Value>, AppError> {
    let claims = require_user(&headers, &state)?;

    let existing = state
        .reviews
        .find_for_user(tour_id, claims.id)
        .await
        .map_err(store_error)?;
    if existing.is_some() {
        return Err(ReviewRuleError::AlreadyReviewed.into());
    }

    validate_rating(body.rating)?;

    state
        .reviews
        .create(tour_id, claims.id, body.rating, body.comment.as_deref())
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Отзыв добавлен",
    })))
}

async fn update_review(
    State(state): State<AppState>,
    Path((_tour_id, review_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<Json<Value>, AppError> {
    let claims = require_user(&headers, &state)?;

    let owned = state
        .reviews
        .find_owned(review_id, claims.id)
        .await
        .map_err(store_error)?;
    if owned.is_none() {
        return Err(ReviewRuleError::NotOwnerEdit.into());
    }

    validate_rating(body.rating)?;

    state
        .reviews
        .update(review_id, body.rating, body.comment.as_deref())
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Отзыв обновлен",
    })))
}

async fn delete_review(
    State(state): State<AppState>,
    Path((_tour_id, review_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let claims = require_user(&headers, &state)?;

    let owned = state
        .reviews
        .find_owned(review_id, claims.id)
        .await
        .map_err(store_error)?;
    if owned.is_none() {
        return Err(ReviewRuleError::NotOwnerDelete.into());
    }

    state.reviews.delete(review_id).await.map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Отзыв удален",
    })))
}

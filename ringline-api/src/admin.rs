use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use ringline_core::models::TourInput;

use crate::error::{store_error, AppError};
use crate::middleware::auth::admin_auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/tours", get(list_tours).post(create_tour))
        .route(
            "/api/admin/tours/{id}",
            axum::routing::put(update_tour).delete(delete_tour),
        )
        .route_layer(from_fn_with_state(state, admin_auth_middleware))
}

async fn list_tours(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let tours = state.catalog.list_tours_admin().await.map_err(store_error)?;

    let mut body = Vec::with_capacity(tours.len());
    for (tour, city_name) in tours {
        let mut v = serde_json::to_value(tour).map_err(anyhow::Error::new)?;
        if let Some(obj) = v.as_object_mut() {
            obj.insert("city_name".to_string(), json!(city_name));
        }
        body.push(v);
    }

    Ok(Json(Value::Array(body)))
}

async fn create_tour(
    State(state): State<AppState>,
    Json(input): Json<TourInput>,
) -> Result<Json<Value>, AppError> {
    let id = state
        .catalog
        .create_tour(&input, state.default_seats)
        .await
        .map_err(store_error)?;

    info!(tour_id = id, "tour created");

    Ok(Json(json!({
        "success": true,
        "message": "Тур добавлен",
        "id": id,
    })))
}

async fn update_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TourInput>,
) -> Result<Json<Value>, AppError> {
    // Unlike create, update has no seat default to fall back on.
    if input.available_seats.is_none() {
        return Err(AppError::ValidationError(
            "Укажите количество мест".to_string(),
        ));
    }

    state
        .catalog
        .update_tour(id, &input)
        .await
        .map_err(store_error)?;

    Ok(Json(json!({
        "success": true,
        "message": "Тур обновлен",
    })))
}

async fn delete_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.catalog.delete_tour(id).await.map_err(store_error)?;

    info!(tour_id = id, "tour deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Тур удален",
    })))
}

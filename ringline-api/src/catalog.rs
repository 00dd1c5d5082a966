use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use ringline_core::models::{City, TourSummary};

use crate::error::{store_error, AppError};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cities", get(list_cities))
        .route("/api/tours", get(list_tours))
        .route("/api/tours/{id}", get(list_tours_by_city))
        .route("/api/tour/{id}", get(get_tour))
}

async fn list_cities(State(state): State<AppState>) -> Result<Json<Vec<City>>, AppError> {
    let cities = state.catalog.list_cities().await.map_err(store_error)?;
    tracing::info!(count = cities.len(), "cities loaded");
    Ok(Json(cities))
}

async fn list_tours(State(state): State<AppState>) -> Result<Json<Vec<TourSummary>>, AppError> {
    let tours = state.catalog.list_tours(None).await.map_err(store_error)?;
    Ok(Json(tours))
}

async fn list_tours_by_city(
    State(state): State<AppState>,
    Path(city_id): Path<i64>,
) -> Result<Json<Vec<TourSummary>>, AppError> {
    let tours = state
        .catalog
        .list_tours(Some(city_id))
        .await
        .map_err(store_error)?;
    Ok(Json(tours))
}

async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TourSummary>, AppError> {
    let tour = state
        .catalog
        .get_tour(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::NotFoundError("Тур не найден".to_string()))?;

    Ok(Json(tour))
}

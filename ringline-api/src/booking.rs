use axum::{
    extract::State, middleware::from_fn_with_state, routing::post, Extension, Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use ringline_order::PlaceBooking;

use crate::error::AppError;
use crate::middleware::auth::{user_auth_middleware, UserClaims};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/booking", post(create_booking))
        .route_layer(from_fn_with_state(state, user_auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    Json(req): Json<PlaceBooking>,
) -> Result<Json<Value>, AppError> {
    let confirmation = state.bookings.place(claims.id, req).await?;

    info!(
        booking_id = confirmation.booking_id,
        user_id = claims.id,
        "booking confirmed"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Заказ оформлен",
        "bookingId": confirmation.booking_id,
        "bookingDetails": confirmation.booking_details,
        "alertMessage": confirmation.alert_message,
    })))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use wayfarer_booking::{Booking, BookingRequest};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{id}", get(get_booking))
}

/// POST /v1/bookings
/// Reserve seats on a trip date and persist the booking.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.reservations.create_booking(req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /v1/bookings/:id
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .reservations
        .get_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking with ID {id} not found")))?;
    Ok(Json(booking))
}

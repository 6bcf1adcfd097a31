use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use wayfarer_catalog::{NewTrip, Trip, TripSearch, TripSummary, TripUpdate};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/trips", get(list_trips).post(create_trip))
        .route(
            "/v1/trips/{id}",
            get(get_trip).put(update_trip).delete(delete_trip),
        )
}

#[derive(Debug, Deserialize)]
struct TripListQuery {
    search: Option<String>,
    location: Option<String>,
}

/// POST /v1/trips
/// Create a trip with its nested images, itinerary and availability rows.
async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<NewTrip>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let trip = state.trips.create_trip(req).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /v1/trips?search=&location=
async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<TripListQuery>,
) -> Result<Json<Vec<TripSummary>>, AppError> {
    let summaries = state
        .trips
        .search_trips(TripSearch {
            search: query.search,
            location: query.location,
        })
        .await?;
    Ok(Json(summaries))
}

/// GET /v1/trips/:id
async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Trip>, AppError> {
    let trip = state
        .trips
        .find_trip(id)
        .await?
        .ok_or_else(|| AppError::NotFoundError(format!("Trip with ID {id} not found")))?;
    Ok(Json(trip))
}

/// PUT /v1/trips/:id
/// Scalar updates plus wholesale replacement of images/itinerary when
/// provided. Availability rows are not editable through this endpoint.
async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TripUpdate>,
) -> Result<Json<Trip>, AppError> {
    let trip = state.trips.update_trip(id, req).await?;
    Ok(Json(trip))
}

/// DELETE /v1/trips/:id
async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.trips.delete_trip(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

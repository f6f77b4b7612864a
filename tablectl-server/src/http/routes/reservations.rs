//! Reservation endpoints (read-only)

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::RestaurantParam;
use crate::http::server::AppState;
use crate::store::CollectionName;

/// GET /api/reservations
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    RestaurantParam(restaurant): RestaurantParam,
) -> Result<Json<Vec<Value>>, ApiError> {
    let reservations = state
        .store()
        .list(restaurant.database(), CollectionName::Reservations)
        .await
        .map_err(ApiError::store("Failed to fetch reservations"))?;

    Ok(Json(reservations))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/reservations", get(list_reservations))
}

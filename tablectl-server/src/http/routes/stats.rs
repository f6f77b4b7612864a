//! Stats endpoint
//!
//! Counts come from the store. Revenue is summed here over every order,
//! loaded in full with no paging.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use tablectl_core::order::{STATUS_CONFIRMED, STATUS_DELIVERED};
use tablectl_core::stats::{revenue, OrderStats};

use crate::http::error::ApiError;
use crate::http::extractors::RestaurantParam;
use crate::http::server::AppState;
use crate::store::{CollectionName, OrderFilter};

/// GET /api/stats
async fn stats(
    State(state): State<Arc<AppState>>,
    RestaurantParam(restaurant): RestaurantParam,
) -> Result<Json<OrderStats>, ApiError> {
    let db = restaurant.database();
    let store = state.store();
    let confirmed = OrderFilter::ItemStatus(STATUS_CONFIRMED.to_string());
    let delivered = OrderFilter::ItemStatus(STATUS_DELIVERED.to_string());

    let (total_orders, confirmed_orders, delivered_orders, orders) = tokio::try_join!(
        store.count_orders(db, &OrderFilter::All),
        store.count_orders(db, &confirmed),
        store.count_orders(db, &delivered),
        store.list(db, CollectionName::Orders),
    )
    .map_err(ApiError::store("Failed to fetch stats"))?;

    Ok(Json(OrderStats {
        restaurant,
        total_orders,
        confirmed_orders,
        delivered_orders,
        revenue: revenue(&orders),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(stats))
}

//! Order endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use tablectl_core::Order;

use crate::http::error::ApiError;
use crate::http::extractors::{OrderBody, RestaurantParam};
use crate::http::server::AppState;
use crate::store::CollectionName;

/// Create order response
#[derive(Serialize)]
pub struct CreatedOrder {
    pub message: &'static str,
    pub order: Order,
}

/// GET /api/orders - every order of the restaurant
async fn list_orders(
    State(state): State<Arc<AppState>>,
    RestaurantParam(restaurant): RestaurantParam,
) -> Result<Json<Vec<Value>>, ApiError> {
    let orders = state
        .store()
        .list(restaurant.database(), CollectionName::Orders)
        .await
        .map_err(ApiError::store("Failed to fetch orders"))?;

    Ok(Json(orders))
}

/// POST /api/orders - create a phone order
async fn create_order(
    State(state): State<Arc<AppState>>,
    RestaurantParam(restaurant): RestaurantParam,
    OrderBody(draft): OrderBody,
) -> Result<Json<CreatedOrder>, ApiError> {
    let order = draft.into_order(Utc::now());
    let db = restaurant.database();

    state
        .store()
        .insert_order(db, &order)
        .await
        .map_err(ApiError::store("Failed to create order"))?;

    tracing::info!(database = %db, phone = %order.phone, items = order.items.len(), "Order created");
    Ok(Json(CreatedOrder {
        message: "Order created successfully",
        order,
    }))
}

/// GET /api/orders/{phone} - most recent order for a phone number
async fn latest_order(
    State(state): State<Arc<AppState>>,
    Path(phone): Path<String>,
    RestaurantParam(restaurant): RestaurantParam,
) -> Result<Json<Value>, ApiError> {
    let order = state
        .store()
        .latest_order(restaurant.database(), &phone)
        .await
        .map_err(ApiError::store("Failed to fetch order"))?
        .ok_or(ApiError::NotFound {
            message: "Order not found",
        })?;

    Ok(Json(order))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/{phone}", get(latest_order))
}

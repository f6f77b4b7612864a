//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use serde::Deserialize;
use serde_json::Value;

use tablectl_core::{OrderDraft, Restaurant};

use super::error::ApiError;

#[derive(Deserialize)]
struct RestaurantQuery {
    restaurant: Option<String>,
}

/// `?restaurant=` label, defaulting to `bansari` when missing or empty
pub struct RestaurantParam(pub Restaurant);

impl<S> FromRequestParts<S> for RestaurantParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query): Query<RestaurantQuery> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: format!("invalid query string: {}", e.body_text()),
            })?;

        Ok(Self(Restaurant::from_param(query.restaurant.as_deref())))
    }
}

/// Create-order body.
///
/// Lenient like a form-post endpoint: an empty body, or one not declared as
/// JSON, is read as `{}`. Any well-formed JSON is accepted; only bytes that
/// do not parse are a 400.
pub struct OrderBody(pub OrderDraft);

impl<S> FromRequest<S> for OrderBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                message: format!("could not read body: {}", e.body_text()),
            })?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(OrderDraft::default()));
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest {
            message: format!("invalid JSON body: {}", e),
        })?;
        Ok(Self(OrderDraft::from_json(body)))
    }
}

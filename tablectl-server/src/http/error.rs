//! API error types with IntoResponse
//!
//! Store failures are logged with their source and answered with a generic
//! per-route message. A missing order is a 404 with a `message` body, not an
//! `error` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Store operation failed (500, logged)
    Store {
        message: &'static str,
        source: StoreError,
    },

    /// Nothing matched (404)
    NotFound { message: &'static str },

    /// Request could not be read (400)
    BadRequest { message: String },
}

impl ApiError {
    /// Adapter for `map_err`: tag a store failure with the route's message.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Store { message, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", message);
                json!({ "error": message })
            }
            Self::NotFound { message } => json!({ "message": message }),
            Self::BadRequest { message } => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

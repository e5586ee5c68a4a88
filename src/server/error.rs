//! HTTP error mapping.
//!
//! All handler failures funnel through `ApiError`, which owns the one
//! mapping from the store error taxonomy to status codes: missing records
//! and dangling references are 404, refused deletes are 409, bad input is
//! 400, anything from the database itself is 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::catalog_store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    MissingFields(Vec<&'static str>),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        ApiError::NotFound(format!("{} with id {} does not exist", entity, id))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } | StoreError::MissingReference { .. } => {
                ApiError::NotFound(err.to_string())
            }
            StoreError::HasDependents { .. } => ApiError::Conflict(err.to_string()),
            StoreError::Database(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "message": format!("missing required fields: {}", fields.join(", ")),
                    "missing_fields": fields,
                })),
            )
                .into_response(),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                Json(json!({ "message": message })),
            )
                .into_response(),
            ApiError::Internal(message) => {
                error!("Store failure: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

//! HTTP error mapping for API handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reel_core::ValidationReport;
use serde_json::json;

/// Failures a request can end in. Each maps to exactly one status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No record has the requested identifier
    #[error("Movie not found")]
    MovieNotFound,

    /// Create payload failed full-schema validation
    #[error("Unprocessable movie payload: {0}")]
    UnprocessableMovie(ValidationReport),

    /// Update payload failed partial-schema validation
    #[error("Invalid movie update: {0}")]
    InvalidUpdate(ValidationReport),

    /// Body was not parseable JSON
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    /// Origin header is not on the allow-list
    #[error("Not allowed by CORS")]
    OriginRejected,
}

impl ApiError {
    /// Status code this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MovieNotFound => StatusCode::NOT_FOUND,
            ApiError::UnprocessableMovie(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidUpdate(_) => StatusCode::BAD_REQUEST,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::OriginRejected => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MovieNotFound => {
                (status, Json(json!({ "message": "Movie not found" }))).into_response()
            }
            ApiError::UnprocessableMovie(report) | ApiError::InvalidUpdate(report) => {
                (status, Json(report)).into_response()
            }
            ApiError::MalformedBody(rejection) => {
                (status, Json(json!({ "message": rejection.body_text() }))).into_response()
            }
            ApiError::OriginRejected => {
                (status, Json(json!({ "message": "Not allowed by CORS" }))).into_response()
            }
        }
    }
}

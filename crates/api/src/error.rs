//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use fulfillment::ServiceError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Dispenser service error.
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Service(err) => service_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn service_error_to_response(err: ServiceError) -> (StatusCode, String) {
    let status = match &err {
        ServiceError::BeverageNotFound(_) | ServiceError::OrderNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Validation(_)
        | ServiceError::InvalidBeverageReference(_)
        | ServiceError::DuplicateBeverageName { .. } => StatusCode::BAD_REQUEST,
        ServiceError::Order(OrderError::Configuration(_)) | ServiceError::Store(_) => {
            tracing::error!(error = %err, reason = err.reason(), "internal server error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        ServiceError::Order(_) => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

/// Malformed JSON or a field of the wrong type.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

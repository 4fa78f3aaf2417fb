//! Error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use openapi_client::models::ErrorResponse;
use tracing::error;

use crate::errors::BuilderError;

/// Handler error carrying a [`BuilderError`]
#[derive(Debug)]
pub struct HandlerError(pub BuilderError);

impl From<BuilderError> for HandlerError {
    fn from(err: BuilderError) -> Self {
        HandlerError(err)
    }
}

/// Status code and short error code for an error
pub fn classify(err: &BuilderError) -> (StatusCode, &'static str) {
    match err {
        BuilderError::ValidationFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed"),
        BuilderError::InvalidFormat(_) => (StatusCode::BAD_GATEWAY, "invalid_format"),
        BuilderError::ApiError(_) | BuilderError::HttpError(_) => {
            (StatusCode::BAD_GATEWAY, "platform_error")
        }
        BuilderError::GenerationError(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
        BuilderError::ConfigError(_) | BuilderError::UrlError(_) => {
            (StatusCode::BAD_REQUEST, "config_error")
        }
        BuilderError::JsonError(_) => (StatusCode::BAD_REQUEST, "invalid_json"),
        BuilderError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        BuilderError::SpeechNotSupported(_) => (StatusCode::NOT_IMPLEMENTED, "not_supported"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let details = match &self.0 {
            BuilderError::ValidationFailed(errors) => Some(serde_json::json!(errors)),
            _ => None,
        };

        let body = ErrorResponse {
            error: code.to_string(),
            message: self.0.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

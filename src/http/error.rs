//! Error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::IntakeError;
use crate::DiabetesCareError;

/// Message returned for failures the caller cannot act on.
pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again later.";

/// JSON `{"error": message}` with the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

impl DiabetesCareError {
    /// Status code a request failing with this error is answered with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Report(_) => StatusCode::BAD_REQUEST,
            Self::ComponentUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) | Self::Io(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DiabetesCareError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Unparseable bodies read the same as empty ones.
            Self::Validation(IntakeError::MalformedBody(detail)) => {
                tracing::debug!("Rejected request body: {detail}");
                IntakeError::Empty.to_string()
            }
            Self::Validation(_) | Self::Report(_) => self.to_string(),
            Self::ComponentUnavailable { .. } => {
                tracing::warn!("Request refused: {self}");
                self.to_string()
            }
            _ => {
                tracing::error!("Request failed: {self}");
                GENERIC_FAILURE.to_string()
            }
        };
        error_response(status, message)
    }
}

//! Error-to-response translation
//!
//! Maps domain errors onto HTTP statuses: validation and coded service
//! errors become 400 with the stable code attached, unknown documents
//! become 404, anything else is a 500.

use crate::domain::error::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

/// Transport-facing error wrapper
#[derive(Debug)]
pub struct ApiError(
    /// The wrapped domain error
    pub Error,
);

/// JSON body emitted for failures
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code().map(|c| c.as_str());
        let (status, message) = match &self.0 {
            Error::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Error::Search { source, .. } => (StatusCode::BAD_REQUEST, source.to_string()),
            Error::NotInitialized { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Error::NotFound { resource } => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", resource))
            }
            other => {
                error!(error = %other, "unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            error: message,
            code,
        };
        (status, Json(body)).into_response()
    }
}

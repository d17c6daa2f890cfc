//! Mapping of core errors onto HTTP responses.

use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use ota_core::format::format_file_size;
use ota_core::{CoreError, FilesError};

/// Error returned by REST handlers
#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by the firmware service
    Core(CoreError),
    /// Malformed request (bad multipart body, missing file, ...)
    BadRequest {
        error: &'static str,
        message: String,
    },
    /// Request body exceeded the transport limit before reaching the store
    PayloadTooLarge,
    /// Client exceeded its rate limit
    RateLimited(&'static str),
    /// Blocking task failed to complete
    Internal(String),
}

impl ApiError {
    pub fn bad_request(error: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error,
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::Core(e)
    }
}

impl From<FilesError> for ApiError {
    fn from(e: FilesError) -> Self {
        ApiError::Core(CoreError::Files(e))
    }
}

fn max_size_label() -> String {
    format_file_size(ota_core::MAX_PAYLOAD_BYTES)
}

fn internal_error() -> (StatusCode, ErrorRes) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorRes::new("Internal server error").with_message("Please contact the administrator"),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Core(CoreError::InvalidInput(message)) => (
                StatusCode::BAD_REQUEST,
                ErrorRes::new("Invalid input").with_message(message),
            ),
            ApiError::Core(CoreError::Files(e)) => match e {
                FilesError::InvalidExtension { filename } => (
                    StatusCode::BAD_REQUEST,
                    ErrorRes::new("Unsupported file type, only .bin firmware files are accepted")
                        .with_filename(filename),
                ),
                FilesError::EmptyPayload { .. } => (
                    StatusCode::BAD_REQUEST,
                    ErrorRes::new("Firmware file is empty"),
                ),
                FilesError::PayloadTooLarge { .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    ErrorRes::new("File size exceeds the limit").with_max_size(max_size_label()),
                ),
                FilesError::InvalidId { id: filename, .. }
                | FilesError::MalformedId { id: filename, .. } => (
                    StatusCode::BAD_REQUEST,
                    ErrorRes::new("Invalid filename format").with_filename(filename),
                ),
                FilesError::NotFound { id: filename, .. } => (
                    StatusCode::NOT_FOUND,
                    ErrorRes::new("File not found").with_filename(filename),
                ),
                e @ (FilesError::InvalidRootDirectory(_) | FilesError::Io { .. }) => {
                    tracing::error!("Firmware storage error: {}", e);
                    internal_error()
                }
            },
            ApiError::BadRequest { error, message } => (
                StatusCode::BAD_REQUEST,
                ErrorRes::new(error).with_message(message),
            ),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorRes::new("File size exceeds the limit").with_max_size(max_size_label()),
            ),
            ApiError::RateLimited(error) => (StatusCode::TOO_MANY_REQUESTS, ErrorRes::new(error)),
            ApiError::Internal(message) => {
                tracing::error!("Request handling failed: {}", message);
                internal_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

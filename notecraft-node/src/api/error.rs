use crate::error::{ErrorCategory, ProcessError};
use crate::models::{ErrorResponse, InvalidMode};
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

const MALFORMED_MULTIPART: &str = "malformed multipart body";
const EXPECTED_MULTIPART: &str = "expected a multipart/form-data body";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("uploaded file exceeds the size limit")]
    PayloadTooLarge,
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            ApiError::PayloadTooLarge => ErrorCategory::PayloadTooLarge,
            ApiError::Process(err) => err.category(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCategory::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCategory::DecodeError
            | ErrorCategory::ExtractionError
            | ErrorCategory::EmptyContent
            | ErrorCategory::UpstreamError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Process(err) => err.public_message(),
            other => other.to_string(),
        }
    }
}

impl From<InvalidMode> for ApiError {
    fn from(err: InvalidMode) -> Self {
        ApiError::InvalidArgument(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge;
        }

        tracing::warn!(detail = %err.body_text(), "failed to read multipart body");
        ApiError::InvalidArgument(MALFORMED_MULTIPART.to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(err: MultipartRejection) -> Self {
        tracing::warn!(detail = %err.body_text(), "rejected non-multipart request");
        ApiError::InvalidArgument(EXPECTED_MULTIPART.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let category = self.category();

        if status.is_server_error() {
            tracing::error!(error = %self, category = category.as_str(), "request failed");
        } else {
            tracing::warn!(error = %self, category = category.as_str(), "request rejected");
        }

        let body = ErrorResponse {
            error: self.public_message(),
            category: category.as_str().to_string(),
            stage: category.stage().as_str().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

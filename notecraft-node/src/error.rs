use crate::extractors::ExtractionError;
use crate::services::llm::LlmClientError;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Request,
    Extraction,
    Llm,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Request => "request",
            Stage::Extraction => "extraction",
            Stage::Llm => "llm",
        }
    }
}

/// Caller-visible error category. Each maps to exactly one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidArgument,
    PayloadTooLarge,
    DecodeError,
    ExtractionError,
    EmptyContent,
    UpstreamError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidArgument => "invalid_argument",
            ErrorCategory::PayloadTooLarge => "payload_too_large",
            ErrorCategory::DecodeError => "decode_error",
            ErrorCategory::ExtractionError => "extraction_error",
            ErrorCategory::EmptyContent => "empty_content",
            ErrorCategory::UpstreamError => "upstream_error",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            ErrorCategory::InvalidArgument | ErrorCategory::PayloadTooLarge => Stage::Request,
            ErrorCategory::DecodeError
            | ErrorCategory::ExtractionError
            | ErrorCategory::EmptyContent => Stage::Extraction,
            ErrorCategory::UpstreamError => Stage::Llm,
        }
    }
}

/// Failure of the extract -> prompt -> complete pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("language model call failed: {0}")]
    Upstream(#[from] LlmClientError),
}

impl ProcessError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProcessError::Extraction(err) => err.category(),
            ProcessError::Upstream(_) => ErrorCategory::UpstreamError,
        }
    }

    /// Message safe to hand back to the caller. Never includes library or
    /// provider error text.
    pub fn public_message(&self) -> String {
        match self {
            ProcessError::Extraction(err) => format!("extraction failed: {}", err.public_message()),
            ProcessError::Upstream(err) => {
                format!("language model call failed: {}", err.public_message())
            }
        }
    }
}

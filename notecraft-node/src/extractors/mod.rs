pub mod ocr;
pub mod pdf;
pub mod registry;
pub mod text;

#[cfg(test)]
mod tests;

use crate::error::ErrorCategory;
use crate::models::{ContentType, UploadedFile};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

pub use self::ocr::{ImageExtractor, OcrEngine, TesseractOcr};
pub use self::pdf::PdfExtractor;
pub use self::registry::ExtractorRegistry;
pub use self::text::PlainTextExtractor;

/// Turns an uploaded payload into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn content_type(&self) -> ContentType;

    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("file is not valid UTF-8 text: {0}")]
    Decode(String),
    #[error("PDF is encrypted")]
    EncryptedPdf,
    #[error("PDF could not be parsed: {0}")]
    MalformedPdf(String),
    #[error("PDF has no extractable text layer")]
    NoTextLayer,
    #[error("unsupported image format: {0}")]
    UnsupportedImage(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("extraction task failed: {0}")]
    Task(String),
    #[error("no readable text found")]
    EmptyContent,
}

impl ExtractionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractionError::Decode(_) => ErrorCategory::DecodeError,
            ExtractionError::EmptyContent => ErrorCategory::EmptyContent,
            _ => ErrorCategory::ExtractionError,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ExtractionError::Decode(_) => "file is not valid UTF-8 text",
            ExtractionError::EncryptedPdf => "PDF is encrypted",
            ExtractionError::MalformedPdf(_) => "PDF could not be parsed",
            ExtractionError::NoTextLayer => "PDF has no extractable text layer",
            ExtractionError::UnsupportedImage(_) => "unsupported image format",
            ExtractionError::Ocr(_) => "OCR engine error",
            ExtractionError::Timeout(_) => "timed out",
            ExtractionError::Task(_) => "internal extraction error",
            ExtractionError::EmptyContent => "no readable text found",
        }
    }
}

static TRAILING_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Tidies text coming out of PDF and OCR engines: unix newlines, no trailing
/// spaces, at most one blank line in a row, trimmed.
pub(crate) fn normalize_text(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\u{000C}', "\n\n");
    let text = TRAILING_SPACES.replace_all(&text, "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

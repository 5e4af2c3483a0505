use crate::extractors::{normalize_text, ExtractionError, TextExtractor};
use crate::models::{ContentType, UploadedFile};
use async_trait::async_trait;
use lopdf::Document;
use pdf_extract::extract_text_from_mem;

pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Structure check with lopdf, then text of every page in document order
    /// via pdf-extract.
    fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
        let document =
            Document::load_mem(data).map_err(|e| ExtractionError::MalformedPdf(e.to_string()))?;

        if document.is_encrypted() {
            return Err(ExtractionError::EncryptedPdf);
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(ExtractionError::NoTextLayer);
        }

        let raw = extract_text_from_mem(data).map_err(|e| ExtractionError::MalformedPdf(e.to_string()))?;
        let text = normalize_text(&raw);

        // Scanned documents come back as whitespace only.
        if text.is_empty() {
            return Err(ExtractionError::NoTextLayer);
        }

        tracing::debug!(pages = page_count, chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::Pdf
    }

    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        let data = file.data.clone();

        tokio::task::spawn_blocking(move || PdfExtractor::extract_text(&data))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }
}

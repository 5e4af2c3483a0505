use crate::extractors::{ExtractionError, TextExtractor};
use crate::models::{ContentType, UploadedFile};
use async_trait::async_trait;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn decode(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let text = std::str::from_utf8(data).map_err(|e| ExtractionError::Decode(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::PlainText
    }

    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        self.decode(&file.data)
    }
}

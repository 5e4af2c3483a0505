use crate::extractors::{
    ExtractionError, ImageExtractor, OcrEngine, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::models::{ContentType, UploadedFile};
use ::image::ImageFormat;
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_SNIFF_WINDOW: usize = 1024;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Holds one extractor per content type and bounds every extraction by a
/// timeout.
#[derive(Clone)]
pub struct ExtractorRegistry {
    text: Arc<dyn TextExtractor>,
    pdf: Arc<dyn TextExtractor>,
    image: Arc<dyn TextExtractor>,
    timeout: Duration,
}

impl ExtractorRegistry {
    pub fn new(ocr: Arc<dyn OcrEngine>, timeout: Duration) -> Self {
        Self {
            text: Arc::new(PlainTextExtractor::new()),
            pdf: Arc::new(PdfExtractor::new()),
            image: Arc::new(ImageExtractor::new(ocr)),
            timeout,
        }
    }

    pub fn get_extractor(&self, content_type: ContentType) -> Arc<dyn TextExtractor> {
        match content_type {
            ContentType::PlainText => self.text.clone(),
            ContentType::Pdf => self.pdf.clone(),
            ContentType::Image => self.image.clone(),
        }
    }

    /// Extracts text with the extractor matching `content_type`. Blank output
    /// is an error.
    pub async fn extract(
        &self,
        content_type: ContentType,
        file: &UploadedFile,
    ) -> Result<String, ExtractionError> {
        let extractor = self.get_extractor(content_type);

        let text = tokio::time::timeout(self.timeout, extractor.extract(file))
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout))??;

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyContent);
        }

        Ok(text)
    }
}

/// Resolves the content type of an upload: sniffed signature first, then the
/// declared MIME type, then the filename extension. Anything unrecognized is
/// treated as plain text.
pub fn detect_content_type(file: &UploadedFile) -> ContentType {
    let declared = file.content_type.as_deref().and_then(content_type_from_mime);

    if let Some(sniffed) = sniff_content_type(&file.data) {
        // "%PDF-" and "GIF89a" are printable, so a declared text upload that
        // decodes cleanly stays text.
        if declared == Some(ContentType::PlainText) && std::str::from_utf8(&file.data).is_ok() {
            tracing::debug!(sniffed = %sniffed, "declared text type kept over sniffed signature");
            return ContentType::PlainText;
        }
        return sniffed;
    }

    if let Some(content_type) = declared {
        return content_type;
    }

    file.extension()
        .map(|ext| content_type_from_extension(&ext))
        .unwrap_or(ContentType::PlainText)
}

pub fn sniff_content_type(data: &[u8]) -> Option<ContentType> {
    if has_pdf_header(data) {
        return Some(ContentType::Pdf);
    }

    // Only formats with unambiguous binary signatures; text starting with
    // "BM" or "P1" must not be taken for an image.
    match ::image::guess_format(data) {
        Ok(
            ImageFormat::Png
            | ImageFormat::Jpeg
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff,
        ) => Some(ContentType::Image),
        _ => None,
    }
}

/// `%PDF-` at the start of the data, after an optional BOM and leading
/// whitespace within the sniff window.
fn has_pdf_header(data: &[u8]) -> bool {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let window = &data[..data.len().min(PDF_SNIFF_WINDOW)];

    window
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .is_some_and(|start| window[start..].starts_with(PDF_MAGIC))
}

pub fn content_type_from_mime(value: &str) -> Option<ContentType> {
    let parsed: mime::Mime = value.parse().ok()?;

    if parsed.essence_str() == mime::APPLICATION_PDF.essence_str() {
        return Some(ContentType::Pdf);
    }

    if parsed.type_() == mime::IMAGE {
        Some(ContentType::Image)
    } else if parsed.type_() == mime::TEXT {
        Some(ContentType::PlainText)
    } else {
        None
    }
}

pub fn content_type_from_extension(extension: &str) -> ContentType {
    match extension.to_lowercase().as_str() {
        "pdf" => ContentType::Pdf,
        "png" | "jpg" | "jpeg" => ContentType::Image,
        _ => ContentType::PlainText,
    }
}

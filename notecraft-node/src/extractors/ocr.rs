use crate::extractors::{normalize_text, ExtractionError, TextExtractor};
use crate::models::{ContentType, UploadedFile};
use ::image::ImageFormat;
use async_trait::async_trait;
use bytes::Bytes;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Recognizes text in an encoded image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: Bytes) -> Result<String, ExtractionError>;
}

/// Runs the `tesseract` CLI, feeding the image on stdin and reading text from
/// stdout. The child is killed if the future is dropped.
pub struct TesseractOcr {
    binary: String,
    lang: String,
}

impl TesseractOcr {
    pub fn new(binary: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: Bytes) -> Result<String, ExtractionError> {
        let mut child = Command::new(&self.binary)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExtractionError::Ocr(format!("failed to run {}: {}", self.binary, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ExtractionError::Ocr("tesseract stdin unavailable".to_string()))?;

        // Feed stdin while the output is drained so neither pipe fills up.
        let writer = tokio::spawn(async move {
            stdin.write_all(&image).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExtractionError::Ocr(e.to_string()))?;

        if let Ok(Err(e)) = writer.await {
            tracing::debug!(error = %e, "tesseract closed stdin early");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

pub struct ImageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }

    /// Decodes the image to make sure it is a supported, intact format before
    /// paying for an OCR run.
    fn validate(data: &[u8]) -> Result<ImageFormat, ExtractionError> {
        let format = ::image::guess_format(data)
            .map_err(|e| ExtractionError::UnsupportedImage(e.to_string()))?;
        let decoded = ::image::load_from_memory_with_format(data, format)
            .map_err(|e| ExtractionError::UnsupportedImage(e.to_string()))?;

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ExtractionError::UnsupportedImage("image has no pixels".to_string()));
        }

        Ok(format)
    }
}

#[async_trait]
impl TextExtractor for ImageExtractor {
    fn content_type(&self) -> ContentType {
        ContentType::Image
    }

    async fn extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        let data = file.data.clone();
        let format = tokio::task::spawn_blocking(move || ImageExtractor::validate(&data))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;

        tracing::debug!(format = ?format, bytes = file.len(), "running OCR");

        let text = self.ocr.recognize(file.data.clone()).await?;
        Ok(normalize_text(&text))
    }
}

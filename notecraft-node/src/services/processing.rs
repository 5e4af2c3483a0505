use crate::error::ProcessError;
use crate::extractors::registry::detect_content_type;
use crate::extractors::ExtractorRegistry;
use crate::models::{Mode, ProcessResponse, UploadedFile};
use crate::prompts::{parse_flashcards, parse_quiz, PromptBuilder};
use crate::services::llm::{LlmClient, LlmClientError};
use std::sync::Arc;
use std::time::Duration;

/// Runs one upload through extraction, prompt building and the completion
/// call, strictly in that order.
pub struct ProcessingService {
    extractors: ExtractorRegistry,
    prompts: PromptBuilder,
    llm: Arc<dyn LlmClient>,
    llm_timeout: Duration,
}

impl ProcessingService {
    pub fn new(
        extractors: ExtractorRegistry,
        prompts: PromptBuilder,
        llm: Arc<dyn LlmClient>,
        llm_timeout: Duration,
    ) -> Self {
        Self {
            extractors,
            prompts,
            llm,
            llm_timeout,
        }
    }

    pub async fn process(&self, file: UploadedFile, mode: Mode) -> Result<ProcessResponse, ProcessError> {
        let content_type = detect_content_type(&file);
        tracing::info!(
            file_name = file.file_name.as_deref().unwrap_or("<unnamed>"),
            bytes = file.len(),
            content_type = %content_type,
            mode = %mode,
            "processing upload"
        );

        let text = self
            .extractors
            .extract(content_type, &file)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, content_type = %content_type, "extraction failed"))?;
        drop(file);

        let prompt = self.prompts.build(mode, &text);
        drop(text);

        let result = tokio::time::timeout(self.llm_timeout, self.llm.complete(&prompt.text))
            .await
            .map_err(|_| LlmClientError::Timeout(self.llm_timeout))
            .and_then(|completion| completion)
            .inspect_err(|e| tracing::error!(error = %e, "completion call failed"))?;

        let (flashcards, questions) = match mode {
            Mode::Summary => (None, None),
            Mode::Flashcards => (parse_flashcards(&result), None),
            Mode::Quiz => (None, parse_quiz(&result)),
        };

        tracing::info!(
            mode = %mode,
            extracted_chars = prompt.source_chars,
            truncated = prompt.truncated,
            response_chars = result.chars().count(),
            "upload processed"
        );

        Ok(ProcessResponse {
            mode,
            content_type,
            result,
            truncated: prompt.truncated,
            extracted_chars: prompt.source_chars,
            flashcards,
            questions,
        })
    }
}

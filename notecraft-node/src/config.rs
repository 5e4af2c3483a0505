use crate::prompts::DEFAULT_MAX_PROMPT_CHARS;
use crate::services::LlmSettings;
use anyhow::{bail, ensure};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Process-wide settings, read once at startup from flags or the environment.
#[derive(Parser, Clone)]
#[command(
    name = "notecraft-node",
    version,
    about = "Turns uploaded notes into summaries, flashcards and quizzes"
)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "NOTECRAFT_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// API key for the completion provider.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub base_url: String,

    #[arg(long, env = "NOTECRAFT_MODEL", default_value = "gpt-4o")]
    pub model: String,

    #[arg(long, env = "NOTECRAFT_TEMPERATURE", default_value_t = 0.5)]
    pub temperature: f32,

    #[arg(
        long,
        env = "NOTECRAFT_SYSTEM_PROMPT",
        default_value = "You are a helpful study assistant."
    )]
    pub system_prompt: String,

    /// Largest accepted upload, in bytes.
    #[arg(long, env = "NOTECRAFT_MAX_UPLOAD_BYTES", default_value_t = 20 * 1024 * 1024)]
    pub max_upload_bytes: usize,

    /// Extracted text beyond this many characters is cut before prompting.
    #[arg(long, env = "NOTECRAFT_MAX_PROMPT_CHARS", default_value_t = DEFAULT_MAX_PROMPT_CHARS)]
    pub max_prompt_chars: usize,

    #[arg(long, env = "NOTECRAFT_LLM_TIMEOUT_SECS", default_value_t = 60)]
    pub llm_timeout_secs: u64,

    #[arg(long, env = "NOTECRAFT_EXTRACTION_TIMEOUT_SECS", default_value_t = 120)]
    pub extraction_timeout_secs: u64,

    #[arg(long, env = "TESSERACT_BIN", default_value = "tesseract")]
    pub tesseract_bin: String,

    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    #[arg(long, env = "NOTECRAFT_OCR_LANG", default_value = "eng")]
    pub ocr_lang: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("OPENAI_API_KEY is set but empty");
        }
        ensure!(
            self.base_url.starts_with("http://") || self.base_url.starts_with("https://"),
            "base URL must be http(s), got '{}'",
            self.base_url
        );
        ensure!(
            (0.0..=2.0).contains(&self.temperature),
            "temperature must be within 0..=2, got {}",
            self.temperature
        );
        ensure!(self.max_upload_bytes > 0, "max upload size must be positive");
        ensure!(self.max_prompt_chars > 0, "max prompt length must be positive");
        ensure!(self.llm_timeout_secs > 0, "LLM timeout must be positive");
        ensure!(self.extraction_timeout_secs > 0, "extraction timeout must be positive");
        Ok(())
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            system_prompt: self.system_prompt.clone(),
            timeout: self.llm_timeout(),
        }
    }
}

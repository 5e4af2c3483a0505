pub mod llm;
pub mod processing;


pub use llm::{LlmClient, LlmClientError, LlmSettings, OpenAiClient};
pub use processing::ProcessingService;

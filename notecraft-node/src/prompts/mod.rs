pub mod parse;


use crate::models::Mode;

pub use parse::{parse_flashcards, parse_quiz};

pub const SUMMARY_INSTRUCTION: &str = "Summarize the following notes in concise bullet points:";

pub const FLASHCARDS_INSTRUCTION: &str = "Generate 5 Q&A flashcards from the notes below. \
Return JSON: [{\"question\":\"...\",\"answer\":\"...\"}, ...]";

pub const QUIZ_INSTRUCTION: &str = "Create 5 multiple-choice questions (A-D options) from these notes. \
Return JSON: [{\"question\":\"...\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"answer\":\"B\"}, ...]";

/// Default cap on how much extracted text goes into a prompt.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub mode: Mode,
    pub text: String,
    /// Characters of extracted text before truncation.
    pub source_chars: usize,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_chars: usize,
}

impl PromptBuilder {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn instruction(mode: Mode) -> &'static str {
        match mode {
            Mode::Summary => SUMMARY_INSTRUCTION,
            Mode::Flashcards => FLASHCARDS_INSTRUCTION,
            Mode::Quiz => QUIZ_INSTRUCTION,
        }
    }

    /// Interpolates `text` into the template for `mode`, cutting it at
    /// `max_chars` characters first.
    pub fn build(&self, mode: Mode, text: &str) -> Prompt {
        let (body, truncated) = truncate_chars(text, self.max_chars);
        let source_chars = text.chars().count();

        if truncated {
            tracing::warn!(
                mode = %mode,
                source_chars,
                max_chars = self.max_chars,
                "extracted text truncated before prompting"
            );
        }

        Prompt {
            mode,
            text: format!("{}\n\n{}", Self::instruction(mode), body),
            source_chars,
            truncated,
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROMPT_CHARS)
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters, and
/// whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

use crate::models::{Flashcard, QuizQuestion};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").unwrap());

/// Reads model output as a JSON array of `T`, tolerating a surrounding
/// Markdown code fence. `None` when the output is anything else.
fn parse_json_array<T: DeserializeOwned>(raw: &str) -> Option<Vec<T>> {
    let trimmed = raw.trim();
    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    match serde_json::from_str::<Vec<T>>(body) {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::debug!(error = %e, "model output is not the requested JSON array");
            None
        }
    }
}

pub fn parse_flashcards(raw: &str) -> Option<Vec<Flashcard>> {
    parse_json_array(raw)
}

pub fn parse_quiz(raw: &str) -> Option<Vec<QuizQuestion>> {
    parse_json_array(raw)
}

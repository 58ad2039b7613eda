//! Prompt builders and the two LLM-backed steps of the pipeline.

use crate::books::Book;
use crate::llm::TextGenerator;
use crate::{Error, ErrorContext, Result};
use std::fmt::Write as _;
use std::sync::Arc;

/// Prefix prepended to every narration script.
pub const SCRIPT_PREFIX: &str = "Discover this amazing book: ";

const SUMMARY_MAX_TOKENS: u32 = 800;

/// Build the prompt asking the model to pick one candidate.
pub fn rerank_prompt(labels: &[String], candidates: &[Book]) -> String {
    let mut prompt = format!(
        "User is interested in: {}.\nCandidates:\n",
        labels.join(", ")
    );
    for (i, c) in candidates.iter().enumerate() {
        let description = c.description.as_deref().unwrap_or("No description");
        let _ = writeln!(prompt, "{}. {}: {}", i + 1, c.title, description);
    }
    prompt.push_str("Pick the best choice, return book name and author");
    prompt
}

/// Build the prompt asking the model for a short spoken recommendation.
pub fn summary_prompt(text: &str, tone: &str) -> String {
    format!(
        "Recommend the following book to user, summarize into a 9-second audio-ready script. \
         Only return the summarized content.\nTone: {}\n---\n{}",
        tone, text
    )
}

/// Picks the best candidate for a set of interest labels.
#[derive(Clone)]
pub struct Recommender {
    generator: Arc<dyn TextGenerator>,
}

impl Recommender {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Returns the model's pick as free text (book name and author).
    pub async fn rerank(&self, labels: &[String], candidates: &[Book]) -> Result<String> {
        if candidates.is_empty() {
            return Err(Error::validation_with_context(
                "no candidate books to rank",
                ErrorContext::new().with_source("recommender"),
            ));
        }
        let pick = self
            .generator
            .complete(&rerank_prompt(labels, candidates), None)
            .await?;
        if pick.trim().is_empty() {
            return Err(Error::runtime_with_context(
                "language model returned an empty recommendation",
                ErrorContext::new().with_source("recommender"),
            ));
        }
        Ok(pick)
    }
}

/// Condenses a recommendation into a narration script.
#[derive(Clone)]
pub struct ScriptWriter {
    generator: Arc<dyn TextGenerator>,
}

impl ScriptWriter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn write(&self, text: &str, tone: &str) -> Result<String> {
        let content = self
            .generator
            .complete(&summary_prompt(text, tone), Some(SUMMARY_MAX_TOKENS))
            .await?;
        Ok(format!("{}{}", SCRIPT_PREFIX, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_prompt_layout() {
        let labels = vec!["science fiction".to_string(), "space".to_string()];
        let candidates = vec![
            Book::new("Dune").with_description("Spice and sand"),
            Book::new("Solaris"),
        ];
        let prompt = rerank_prompt(&labels, &candidates);
        assert_eq!(
            prompt,
            "User is interested in: science fiction, space.\nCandidates:\n\
             1. Dune: Spice and sand\n\
             2. Solaris: No description\n\
             Pick the best choice, return book name and author"
        );
    }

    #[test]
    fn test_summary_prompt_carries_tone() {
        let prompt = summary_prompt("Dune by Frank Herbert", "calm_senior");
        assert!(prompt.contains("Tone: calm_senior\n---\nDune by Frank Herbert"));
        assert!(prompt.starts_with("Recommend the following book"));
    }
}

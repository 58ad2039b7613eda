//! 旁白流水线：标签 → 候选书目 → LLM 重排 → 旁白脚本 → 语音。
//!
//! Narration pipeline.
//!
//! ```text
//! labels ─► BookSource ─► candidates ─► Recommender ─► pick
//!                                                       │
//!        SynthesisResult ◄─ SpeechSynthesizer ◄─ ScriptWriter
//! ```
//!
//! Every collaborator is injected; nothing here is constructed lazily.

mod prompts;

pub use prompts::{rerank_prompt, summary_prompt, Recommender, ScriptWriter, SCRIPT_PREFIX};

use crate::books::{Book, BookSource};
use crate::llm::TextGenerator;
use crate::synthesis::{SpeechSynthesizer, SynthesisResult};
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_CANDIDATES_PER_LABEL: usize = 20;

/// Everything produced for one set of labels.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationOutcome {
    pub labels: Vec<String>,
    pub candidate_count: usize,
    pub recommendation: String,
    pub script: String,
    pub synthesis: SynthesisResult,
}

pub struct NarrationPipeline {
    books: Arc<dyn BookSource>,
    recommender: Recommender,
    writer: ScriptWriter,
    synthesizer: Arc<SpeechSynthesizer>,
    candidates_per_label: usize,
}

impl NarrationPipeline {
    pub fn new(
        books: Arc<dyn BookSource>,
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<SpeechSynthesizer>,
    ) -> Self {
        Self {
            books,
            recommender: Recommender::new(generator.clone()),
            writer: ScriptWriter::new(generator),
            synthesizer,
            candidates_per_label: DEFAULT_CANDIDATES_PER_LABEL,
        }
    }

    pub fn with_candidates_per_label(mut self, n: usize) -> Self {
        self.candidates_per_label = n.max(1);
        self
    }

    /// Gather candidates for every label. A label whose lookup fails is skipped.
    pub async fn candidates(&self, labels: &[String]) -> Vec<Book> {
        let mut candidates = Vec::new();
        for label in labels {
            match self
                .books
                .books_for_subject(label, self.candidates_per_label)
                .await
            {
                Ok(mut books) => candidates.append(&mut books),
                Err(e) => warn!(subject = label.as_str(), "book lookup failed: {}", e),
            }
        }
        candidates
    }

    /// Pick a book for `labels`, returning the candidates considered and the pick.
    ///
    /// Blank labels are ignored.
    pub async fn recommend(&self, labels: &[String]) -> Result<(Vec<Book>, String)> {
        let labels = clean_labels(labels);
        if labels.is_empty() {
            return Err(Error::validation_with_context(
                "Provide at least one label",
                ErrorContext::new()
                    .with_field_path("labels")
                    .with_source("narration_pipeline"),
            ));
        }
        let candidates = self.candidates(&labels).await;
        if candidates.is_empty() {
            return Err(Error::validation_with_context(
                "no candidate books found for the given labels",
                ErrorContext::new()
                    .with_details(labels.join(", "))
                    .with_source("narration_pipeline"),
            ));
        }
        let pick = self.recommender.rerank(&labels, &candidates).await?;
        Ok((candidates, pick))
    }

    /// Run the whole chain. Synthesis failures are reported in the outcome.
    pub async fn run(&self, labels: &[String], voice_style: Option<&str>) -> Result<NarrationOutcome> {
        let (candidates, recommendation) = self.recommend(labels).await?;
        let tone = self
            .synthesizer
            .catalog()
            .resolve(voice_style)
            .name
            .to_string();
        let script = self.writer.write(&recommendation, &tone).await?;
        info!(
            candidates = candidates.len(),
            style = tone.as_str(),
            script_chars = script.chars().count(),
            "narration script ready"
        );
        let synthesis = self
            .synthesizer
            .synthesize_segments(&script, Some(tone.as_str()))
            .await;
        Ok(NarrationOutcome {
            labels: clean_labels(labels),
            candidate_count: candidates.len(),
            recommendation,
            script,
            synthesis,
        })
    }
}

fn clean_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

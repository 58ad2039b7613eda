//! End-to-end narration with in-process collaborators.

mod common;

use async_trait::async_trait;
use common::{catalog, fast_options, registry, style_for, Behavior, ScriptedProvider};
use readio::books::{Book, BookSource};
use readio::llm::TextGenerator;
use readio::narration::SCRIPT_PREFIX;
use readio::{Error, FailureKind, NarrationPipeline, ProviderId, SpeechSynthesizer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct FixedShelf {
    by_subject: HashMap<String, Vec<Book>>,
    queried: Mutex<Vec<String>>,
}

#[async_trait]
impl BookSource for FixedShelf {
    async fn books_for_subject(&self, subject: &str, limit: usize) -> readio::Result<Vec<Book>> {
        self.queried.lock().unwrap().push(subject.to_string());
        match subject {
            "broken" => Err(Error::runtime("library offline")),
            other => Ok(self
                .by_subject
                .get(other)
                .map(|books| books.iter().take(limit).cloned().collect())
                .unwrap_or_default()),
        }
    }
}

/// Answers rerank prompts with a fixed pick and summary prompts with a fixed script.
#[derive(Default)]
struct CannedModel {
    prompts: Mutex<Vec<(String, Option<u32>)>>,
}

#[async_trait]
impl TextGenerator for CannedModel {
    async fn complete(&self, prompt: &str, max_tokens: Option<u32>) -> readio::Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_tokens));
        if prompt.starts_with("User is interested in") {
            Ok("Dune by Frank Herbert".to_string())
        } else {
            Ok("A desert planet. A young heir. A fight for the spice.".to_string())
        }
    }
}

fn shelf() -> Arc<FixedShelf> {
    let mut by_subject = HashMap::new();
    by_subject.insert(
        "science fiction".to_string(),
        vec![
            Book::new("Dune")
                .with_author("Frank Herbert")
                .with_description("Spice."),
            Book::new("Solaris").with_author("Stanisław Lem"),
        ],
    );
    by_subject.insert(
        "history".to_string(),
        vec![Book::new("SPQR").with_author("Mary Beard")],
    );
    Arc::new(FixedShelf {
        by_subject,
        queried: Mutex::new(Vec::new()),
    })
}

fn synthesizer(polly: Arc<ScriptedProvider>) -> Arc<SpeechSynthesizer> {
    Arc::new(
        SpeechSynthesizer::new(
            catalog(
                &[ProviderId::Polly],
                None,
                vec![("calm_senior", style_for(&[ProviderId::Polly]))],
            ),
            registry(&[polly]),
            fast_options().with_max_chunk_length(30),
        )
        .unwrap(),
    )
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_run_produces_script_and_audio() {
    let model = Arc::new(CannedModel::default());
    let polly = ScriptedProvider::new(ProviderId::Polly, Behavior::Bytes);
    let pipeline = NarrationPipeline::new(shelf(), model.clone(), synthesizer(polly.clone()));

    let outcome = pipeline
        .run(&labels(&["science fiction", "history", "broken"]), Some("calm_senior"))
        .await
        .unwrap();

    assert_eq!(outcome.candidate_count, 3);
    assert_eq!(outcome.recommendation, "Dune by Frank Herbert");
    assert!(outcome.script.starts_with(SCRIPT_PREFIX));
    assert!(outcome.synthesis.success);
    assert_eq!(outcome.synthesis.voice_style.as_str(), "calm_senior");
    assert!(outcome.synthesis.segments.len() > 1);
    assert_eq!(polly.calls(), outcome.synthesis.segments.len());

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].0.contains("1. Dune: Spice."));
    assert!(prompts[0].0.contains("3. SPQR: No description"));
    assert_eq!(prompts[0].1, None);
    assert!(prompts[1].0.contains("Tone: calm_senior"));
    assert!(prompts[1].0.contains("Dune by Frank Herbert"));
    assert_eq!(prompts[1].1, Some(800));
}

#[tokio::test]
async fn test_empty_labels_are_rejected() {
    let pipeline = NarrationPipeline::new(
        shelf(),
        Arc::new(CannedModel::default()),
        synthesizer(ScriptedProvider::new(ProviderId::Polly, Behavior::Bytes)),
    );

    let err = pipeline.run(&[], None).await.unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains("Provide at least one label"));
}

#[tokio::test]
async fn test_blank_labels_are_not_looked_up() {
    let books = shelf();
    let pipeline = NarrationPipeline::new(
        books.clone(),
        Arc::new(CannedModel::default()),
        synthesizer(ScriptedProvider::new(ProviderId::Polly, Behavior::Bytes)),
    );

    let outcome = pipeline
        .run(&labels(&["", " history ", "   "]), None)
        .await
        .unwrap();

    assert_eq!(*books.queried.lock().unwrap(), vec!["history".to_string()]);
    assert_eq!(outcome.labels, vec!["history".to_string()]);
    assert_eq!(outcome.candidate_count, 1);

    let err = pipeline.run(&labels(&["  ", ""]), None).await.unwrap_err();
    assert!(err.to_string().contains("Provide at least one label"));
}

#[tokio::test]
async fn test_no_candidates_is_a_validation_error() {
    let model = Arc::new(CannedModel::default());
    let pipeline = NarrationPipeline::new(
        shelf(),
        model.clone(),
        synthesizer(ScriptedProvider::new(ProviderId::Polly, Behavior::Bytes)),
    );

    let err = pipeline
        .recommend(&labels(&["poetry", "broken"]))
        .await
        .unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::ConfigError);
    assert!(model.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_synthesis_failure_is_reported_in_outcome() {
    let polly = ScriptedProvider::new(ProviderId::Polly, Behavior::Fail(503));
    let pipeline = NarrationPipeline::new(
        shelf(),
        Arc::new(CannedModel::default()),
        synthesizer(polly),
    )
    .with_candidates_per_label(1);

    let outcome = pipeline
        .run(&labels(&["science fiction"]), None)
        .await
        .unwrap();

    assert_eq!(outcome.candidate_count, 1);
    assert!(!outcome.synthesis.success);
    assert_eq!(
        outcome.synthesis.failure_kind(),
        Some(FailureKind::ProviderUnavailable)
    );
}

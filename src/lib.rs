//! # readio
//!
//! 书籍推荐旁白的语音合成库：脚本分块、多厂商 TTS 回退与时长估算。
//!
//! Narrated book recommendations: script chunking, multi-provider speech
//! synthesis with fallback, and duration estimation.
//!
//! ## Overview
//!
//! A short narration script is turned into audio by a [`SpeechSynthesizer`].
//! Providers are tried in catalog order; the first one returning non-empty
//! audio wins. Long scripts can instead be split by the [`chunker`] and
//! synthesized segment by segment, each segment carrying an estimated
//! duration.
//!
//! Voices are configured per style in a YAML [`VoiceCatalog`]. Unknown style
//! names fall back to the catalog default.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use readio::{Settings, SpeechSynthesizer, VoiceCatalog};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> readio::Result<()> {
//!     let settings = Settings::from_env();
//!     let registry = readio::tts::registry_from_settings(&settings).await?;
//!     let catalog = VoiceCatalog::builtin()?.retain_providers(&registry.ids())?;
//!     let synthesizer = SpeechSynthesizer::new(
//!         Arc::new(catalog),
//!         registry,
//!         settings.synthesis.clone(),
//!     )?;
//!
//!     let result = synthesizer
//!         .synthesize("Discover this amazing book: Dune.", Some("calm_senior"))
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chunker`] | Sentence-boundary script chunking |
//! | [`config`] | Voice catalog and environment settings |
//! | [`synthesis`] | Fallback and segmented synthesis, duration estimation |
//! | [`tts`] | Speech provider trait and PlayHT / ElevenLabs / Polly adapters |
//! | [`books`] | Candidate books from OpenLibrary |
//! | [`llm`] | Chat-completions client used for ranking and script writing |
//! | [`narration`] | Labels → recommendation → script → audio |
//! | [`transport`] | Shared HTTP client construction |

pub mod books;
pub mod chunker;
pub mod config;
pub mod error_code;
pub mod llm;
pub mod narration;
pub mod synthesis;
pub mod transport;
pub mod tts;

// Re-export main types for convenience
pub use config::{ProviderId, Settings, StyleName, SynthesisOptions, VoiceCatalog, VoiceId};
pub use error_code::FailureKind;
pub use narration::{NarrationOutcome, NarrationPipeline};
pub use synthesis::{ScriptSegment, SpeechSynthesizer, SynthesisFailure, SynthesisResult};
pub use tts::{AudioOutput, SpeechProvider, SpeechRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

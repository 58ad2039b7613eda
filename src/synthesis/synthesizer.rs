//! Multi-provider speech synthesis.

use super::duration::estimate_duration;
use super::result::{ScriptSegment, SynthesisResult};
use crate::chunker::chunk;
use crate::config::{ResolvedStyle, StyleName, SynthesisOptions, VoiceCatalog};
use crate::error_code::FailureKind;
use crate::tts::{AudioOutput, ProviderRegistry, SpeechProvider, SpeechRequest};
use crate::{Error, ErrorContext, Result};
use futures::{StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Turns scripts into audio through the configured providers.
///
/// Holds only read-only state, so one instance can serve concurrent requests.
pub struct SpeechSynthesizer {
    catalog: Arc<VoiceCatalog>,
    registry: ProviderRegistry,
    options: SynthesisOptions,
}

impl SpeechSynthesizer {
    /// Fails when a provider in the catalog's fallback order has no registered
    /// implementation.
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        registry: ProviderRegistry,
        options: SynthesisOptions,
    ) -> Result<Self> {
        for id in catalog.providers() {
            if !registry.contains(*id) {
                return Err(Error::configuration_with_context(
                    format!("provider '{}' is in the fallback order but not registered", id),
                    ErrorContext::new()
                        .with_field_path("providers")
                        .with_details(format!("registered: {:?}", registry.ids()))
                        .with_source("speech_synthesizer"),
                ));
            }
        }
        Ok(Self {
            catalog,
            registry,
            options,
        })
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    fn resolve_style(&self, requested: Option<&str>) -> ResolvedStyle<'_> {
        let resolved = self.catalog.resolve(requested);
        if resolved.used_default {
            if let Some(name) = requested {
                debug!(
                    requested = name,
                    style = resolved.name.as_str(),
                    "unknown voice style, using default"
                );
            }
        }
        resolved
    }

    /// Synthesize `text` as a whole, trying providers in fallback order.
    ///
    /// Providers without a voice for the style are skipped. The first provider to
    /// return non-empty audio wins and later providers are not called. When every
    /// provider fails the result is an `Exhausted` failure with no message.
    pub async fn synthesize(&self, text: &str, voice_style: Option<&str>) -> SynthesisResult {
        let resolved = self.resolve_style(voice_style);

        for provider_id in self.catalog.providers() {
            let Some(voice) = resolved.style.voice_for(*provider_id) else {
                debug!(
                    provider = provider_id.as_str(),
                    style = resolved.name.as_str(),
                    "no voice configured, skipping provider"
                );
                continue;
            };
            let Some(provider) = self.registry.get(*provider_id) else {
                continue;
            };

            let request = SpeechRequest::new(text, voice.clone());
            let start = Instant::now();
            match self.attempt(provider.as_ref(), &request).await {
                Ok(audio) => {
                    info!(
                        provider = provider_id.as_str(),
                        style = resolved.name.as_str(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "speech synthesized"
                    );
                    let segment = ScriptSegment {
                        index: 0,
                        estimated_duration_seconds: estimate_duration(
                            text,
                            self.options.words_per_minute,
                        ),
                        text: request.text,
                        audio,
                    };
                    return SynthesisResult::succeeded(
                        *provider_id,
                        resolved.name.clone(),
                        voice.voice_id.clone(),
                        vec![segment],
                    );
                }
                Err(e) => {
                    warn!(
                        provider = provider_id.as_str(),
                        style = resolved.name.as_str(),
                        kind = e.failure_kind().name(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "speech provider failed, trying next: {}",
                        e
                    );
                }
            }
        }

        warn!(style = resolved.name.as_str(), "all speech providers exhausted");
        SynthesisResult::failed(resolved.name.clone(), FailureKind::Exhausted, None)
    }

    /// Chunk `script` and synthesize every segment through the segment provider.
    ///
    /// There is no cross-provider fallback here: the first failing segment fails
    /// the whole result. Segments run up to `segment_concurrency` at a time and
    /// are returned in script order.
    pub async fn synthesize_segments(
        &self,
        script: &str,
        voice_style: Option<&str>,
    ) -> SynthesisResult {
        let resolved = self.resolve_style(voice_style);
        let style_name = resolved.name.clone();
        let provider_id = self.catalog.segment_provider();

        let Some(voice) = resolved.style.voice_for(provider_id) else {
            return SynthesisResult::failed(
                style_name,
                FailureKind::ConfigError,
                Some(format!(
                    "style '{}' has no voice for segment provider '{}'",
                    resolved.name, provider_id
                )),
            );
        };
        let Some(provider) = self.registry.get(provider_id) else {
            return SynthesisResult::failed(
                style_name,
                FailureKind::ConfigError,
                Some(format!("segment provider '{}' is not registered", provider_id)),
            );
        };
        let provider: &dyn SpeechProvider = provider.as_ref();
        let wpm = self.options.words_per_minute;

        let chunks = chunk(script, self.options.max_chunk_length);
        let start = Instant::now();
        let outcome: std::result::Result<Vec<ScriptSegment>, (usize, Error)> =
            futures::stream::iter(chunks.into_iter().enumerate())
                .map(|(index, text)| {
                    let request = SpeechRequest::new(text, voice.clone());
                    async move {
                        let audio = self
                            .attempt(provider, &request)
                            .await
                            .map_err(|e| (index, e))?;
                        Ok::<_, (usize, Error)>(ScriptSegment {
                            index,
                            estimated_duration_seconds: estimate_duration(&request.text, wpm),
                            text: request.text,
                            audio,
                        })
                    }
                })
                .buffered(self.options.segment_concurrency.max(1))
                .try_collect()
                .await;

        match outcome {
            Ok(segments) => {
                info!(
                    provider = provider_id.as_str(),
                    style = style_name.as_str(),
                    segments = segments.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "script synthesized"
                );
                SynthesisResult::succeeded(provider_id, style_name, voice.voice_id.clone(), segments)
            }
            Err((index, e)) => {
                warn!(
                    provider = provider_id.as_str(),
                    style = style_name.as_str(),
                    segment = index,
                    kind = e.failure_kind().name(),
                    "segment synthesis failed: {}",
                    e
                );
                let kind = e.failure_kind();
                SynthesisResult::failed(
                    style_name,
                    kind,
                    Some(format!("Failed to generate audio for segment {}: {}", index, e)),
                )
            }
        }
    }

    /// Run segmented synthesis once per catalog style.
    pub async fn synthesize_all_styles(&self, script: &str) -> BTreeMap<StyleName, SynthesisResult> {
        let mut versions = BTreeMap::new();
        for (name, _) in self.catalog.styles() {
            let result = self.synthesize_segments(script, Some(name.as_str())).await;
            versions.insert(name.clone(), result);
        }
        versions
    }

    /// One provider call under the per-call timeout. Empty audio is an error.
    async fn attempt(
        &self,
        provider: &dyn SpeechProvider,
        request: &SpeechRequest,
    ) -> Result<AudioOutput> {
        let timeout = self.options.provider_timeout;
        let audio = match tokio::time::timeout(timeout, provider.synthesize(request)).await {
            Ok(res) => res?,
            Err(_) => {
                return Err(Error::Timeout {
                    provider: provider.id().to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        };
        if audio.is_empty() {
            return Err(Error::EmptyAudio {
                provider: provider.id().to_string(),
            });
        }
        Ok(audio)
    }
}

impl std::fmt::Debug for SpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSynthesizer")
            .field("providers", &self.catalog.providers())
            .field("segment_provider", &self.catalog.segment_provider())
            .field("options", &self.options)
            .finish()
    }
}

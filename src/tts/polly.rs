//! Amazon Polly via the AWS SDK.

use super::provider::SpeechProvider;
use super::types::{AudioFormat, AudioOutput, SpeechRequest};
use crate::config::ProviderId;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine, LanguageCode, OutputFormat, Voice, VoiceId};
use serde::Serialize;

const DEFAULT_ENGINE: &str = "neural";

/// A voice Polly reports as available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollyVoice {
    pub id: String,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub language_code: Option<String>,
    pub language_name: Option<String>,
    pub supported_engines: Vec<String>,
}

impl PollyVoice {
    /// `None` for entries without a voice id, which cannot be put in a catalog.
    fn from_sdk(voice: &Voice) -> Option<Self> {
        Some(Self {
            id: voice.id()?.as_str().to_string(),
            name: voice.name().map(str::to_string),
            gender: voice.gender().map(|g| g.as_str().to_string()),
            language_code: voice.language_code().map(|c| c.as_str().to_string()),
            language_name: voice.language_name().map(str::to_string),
            supported_engines: voice
                .supported_engines()
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
        })
    }
}

pub struct PollyProvider {
    client: aws_sdk_polly::Client,
}

impl PollyProvider {
    pub fn new(client: aws_sdk_polly::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential chain for `region`.
    pub async fn from_region(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_polly::config::Region::new(region.into()))
            .load()
            .await;
        Self::new(aws_sdk_polly::Client::new(&config))
    }

    /// Voices Polly offers for `language_code` on `engine`, following pagination.
    pub async fn available_voices(
        &self,
        language_code: &str,
        engine: &str,
    ) -> Result<Vec<PollyVoice>> {
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;
        loop {
            let mut call = self
                .client
                .describe_voices()
                .language_code(LanguageCode::from(language_code))
                .engine(Engine::from(engine));
            if let Some(token) = next_token.take() {
                call = call.next_token(token);
            }
            let output = call.send().await.map_err(|e| {
                Error::runtime_with_context(
                    format!("Failed to get voices: {}", DisplayErrorContext(&e)),
                    ErrorContext::new()
                        .with_details(format!("language: {}, engine: {}", language_code, engine))
                        .with_source("polly"),
                )
            })?;
            voices.extend(output.voices().iter().filter_map(PollyVoice::from_sdk));
            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }
        Ok(voices)
    }
}

#[async_trait]
impl SpeechProvider for PollyProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Polly
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioOutput> {
        let voice = &request.voice;
        let engine = voice.engine.as_deref().unwrap_or(DEFAULT_ENGINE);
        let mut call = self
            .client
            .synthesize_speech()
            .text(request.text.clone())
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(voice.voice_id.as_str()))
            .engine(Engine::from(engine));
        if let Some(code) = &voice.language_code {
            call = call.language_code(LanguageCode::from(code.as_str()));
        }

        let output = call.send().await.map_err(|e| {
            Error::runtime_with_context(
                format!("Polly request failed: {}", DisplayErrorContext(&e)),
                ErrorContext::new()
                    .with_details(format!("voice: {}", voice.voice_id))
                    .with_source("polly"),
            )
        })?;
        let data = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| Error::Encoding(format!("failed to read Polly audio stream: {}", e)))?
            .into_bytes();
        Ok(AudioOutput::bytes(data, AudioFormat::Mp3))
    }
}

//! ElevenLabs client. Returns the synthesized audio bytes directly.

use super::provider::SpeechProvider;
use super::types::{AudioFormat, AudioOutput, SpeechRequest};
use crate::config::ProviderId;
use crate::transport::{build_http_client, HttpClientConfig};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;

const DEFAULT_MODEL: &str = "eleven_multilingual_v2";

pub struct ElevenLabsProvider {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    api_key: String,
}

impl ElevenLabsProvider {
    pub fn builder() -> ElevenLabsProviderBuilder {
        ElevenLabsProviderBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn id(&self) -> ProviderId {
        ProviderId::ElevenLabs
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioOutput> {
        let endpoint = format!(
            "{}/v1/text-to-speech/{}",
            self.base_url.trim_end_matches('/'),
            request.voice.voice_id
        );
        let body = serde_json::json!({
            "text": request.text,
            "model_id": self.model,
        });
        let response = self
            .http_client
            .post(&endpoint)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let format = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(AudioFormat::from_content_type)
            .unwrap_or(AudioFormat::Mp3);
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let body_str = String::from_utf8_lossy(&bytes);
            return Err(Error::remote(status.as_u16(), body_str, "elevenlabs"));
        }
        Ok(AudioOutput::bytes(bytes, format))
    }
}

pub struct ElevenLabsProviderBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    http_client: Option<reqwest::Client>,
    http_config: HttpClientConfig,
}

impl ElevenLabsProviderBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            http_client: None,
            http_config: HttpClientConfig::default(),
        }
    }
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn build(self) -> Result<ElevenLabsProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("ELEVENLABS_API_KEY").ok())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required (ELEVENLABS_API_KEY)",
                    ErrorContext::new().with_source("elevenlabs"),
                )
            })?;
        let http_client = match self.http_client {
            Some(c) => c,
            None => build_http_client(&self.http_config)?,
        };
        Ok(ElevenLabsProvider {
            http_client,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .unwrap_or_else(|| "https://api.elevenlabs.io".to_string()),
            api_key,
        })
    }
}

impl Default for ElevenLabsProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

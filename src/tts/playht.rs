//! PlayHT client. The convert endpoint answers with a hosted audio URL.

use super::provider::SpeechProvider;
use super::types::{AudioOutput, SpeechRequest};
use crate::config::ProviderId;
use crate::transport::{build_http_client, HttpClientConfig};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;

pub struct PlayHtProvider {
    http_client: reqwest::Client,
    base_url: String,
    endpoint_path: String,
    api_key: String,
}

impl PlayHtProvider {
    pub fn builder() -> PlayHtProviderBuilder {
        PlayHtProviderBuilder::new()
    }
}

#[async_trait]
impl SpeechProvider for PlayHtProvider {
    fn id(&self) -> ProviderId {
        ProviderId::PlayHt
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioOutput> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint_path);
        let body = serde_json::json!({
            "voice": request.voice.voice_id.as_str(),
            "content": request.text,
        });
        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let body_str = response.text().await?;
        if !status.is_success() {
            return Err(Error::remote(status.as_u16(), body_str, "playht"));
        }
        let json: serde_json::Value = serde_json::from_str(&body_str)?;
        let url = json
            .get("audio_url")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if url.is_empty() {
            tracing::debug!(provider = "playht", "convert response carried no audio_url");
        }
        Ok(AudioOutput::url(url))
    }
}

pub struct PlayHtProviderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    http_client: Option<reqwest::Client>,
    http_config: HttpClientConfig,
}

impl PlayHtProviderBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            endpoint_path: None,
            http_client: None,
            http_config: HttpClientConfig::default(),
        }
    }
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }
    /// Share an existing HTTP client instead of building one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn build(self) -> Result<PlayHtProvider> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("PLAYHT_API_KEY").ok())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required (PLAYHT_API_KEY)",
                    ErrorContext::new().with_source("playht"),
                )
            })?;
        let base_url = self
            .base_url
            .unwrap_or_else(|| "https://api.play.ht".to_string());
        let endpoint_path = self
            .endpoint_path
            .unwrap_or_else(|| "/convert".to_string());
        let endpoint_path = if endpoint_path.starts_with('/') {
            endpoint_path
        } else {
            format!("/{}", endpoint_path)
        };
        let http_client = match self.http_client {
            Some(c) => c,
            None => build_http_client(&self.http_config)?,
        };
        Ok(PlayHtProvider {
            http_client,
            base_url,
            endpoint_path,
            api_key,
        })
    }
}

impl Default for PlayHtProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

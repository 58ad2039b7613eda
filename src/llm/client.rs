//! OpenAI-compatible chat-completions client.

use super::TextGenerator;
use crate::transport::{build_http_client, HttpClientConfig};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.llama.com/compat/v1";
const DEFAULT_MODEL: &str = "Llama-4-Maverick-17B-128E-Instruct-FP8";

/// Client for a chat-completions endpoint.
pub struct ChatClient {
    http_client: reqwest::Client,
    model: String,
    base_url: String,
    endpoint_path: String,
    api_key: String,
}

impl ChatClient {
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn complete(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), self.endpoint_path);
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(max_tokens) = max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
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
            return Err(Error::remote(status.as_u16(), body_str, "llm"));
        }
        let json: serde_json::Value = serde_json::from_str(&body_str)?;
        let content = json
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }
}

pub struct ChatClientBuilder {
    model: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    endpoint_path: Option<String>,
    http_client: Option<reqwest::Client>,
    http_config: HttpClientConfig,
}

impl ChatClientBuilder {
    pub fn new() -> Self {
        Self {
            model: None,
            api_key: None,
            base_url: None,
            endpoint_path: None,
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
    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
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

    pub fn build(self) -> Result<ChatClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("LLAMA4_API_KEY").ok())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "API key required (LLAMA4_API_KEY)",
                    ErrorContext::new().with_source("llm"),
                )
            })?;
        let endpoint_path = self
            .endpoint_path
            .unwrap_or_else(|| "/chat/completions".to_string());
        let endpoint_path = if endpoint_path.starts_with('/') {
            endpoint_path
        } else {
            format!("/{}", endpoint_path)
        };
        let http_client = match self.http_client {
            Some(c) => c,
            None => build_http_client(&self.http_config)?,
        };
        Ok(ChatClient {
            http_client,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            endpoint_path,
            api_key,
        })
    }
}

impl Default for ChatClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

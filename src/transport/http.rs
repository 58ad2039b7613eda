use crate::{Error, Result};
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// Knobs for the shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Minimal production-friendly defaults (env-overridable).
    pub fn from_env() -> Self {
        let timeout_secs = env::var("READIO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);
        Self {
            timeout: Duration::from_secs(timeout_secs),
            pool_max_idle_per_host: env::var("READIO_HTTP_POOL_MAX_IDLE_PER_HOST")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(8),
            pool_idle_timeout: Duration::from_secs(90),
            proxy_url: env::var("READIO_PROXY_URL").ok(),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            pool_max_idle_per_host: 8,
            pool_idle_timeout: Duration::from_secs(90),
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("Readio/{}", env!("CARGO_PKG_VERSION"))
}

/// Build a `reqwest::Client` from the given config.
///
/// An unparsable proxy URL is ignored rather than failing the build.
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(Some(config.pool_idle_timeout))
        .user_agent(config.user_agent.clone());

    if let Some(proxy_url) = &config.proxy_url {
        match Proxy::all(proxy_url) {
            Ok(proxy) => builder = builder.proxy(proxy),
            Err(e) => tracing::warn!(proxy = proxy_url.as_str(), "ignoring invalid proxy url: {}", e),
        }
    }

    builder
        .build()
        .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(TransportError::Http(e))
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Transport(TransportError::Url(e))
    }
}

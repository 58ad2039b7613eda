//! Process settings read from the environment.

use crate::transport::HttpClientConfig;
use std::env;
use std::time::Duration;

/// Knobs for [`crate::synthesis::SpeechSynthesizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    /// Upper bound on a single provider call.
    pub provider_timeout: Duration,
    /// Advisory chunk length for segmented synthesis, in characters.
    pub max_chunk_length: usize,
    /// Speaking rate used for duration estimates.
    pub words_per_minute: f64,
    /// How many segments may be in flight at once. 1 means strictly sequential.
    pub segment_concurrency: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(30),
            max_chunk_length: 150,
            words_per_minute: 150.0,
            segment_concurrency: 1,
        }
    }
}

impl SynthesisOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider_timeout: env_parse::<u64>("READIO_TTS_TIMEOUT_SECS")
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.provider_timeout),
            max_chunk_length: env_parse::<usize>("READIO_MAX_CHUNK_LENGTH")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_chunk_length),
            words_per_minute: env_parse::<f64>("READIO_WORDS_PER_MINUTE")
                .filter(|w| *w > 0.0)
                .unwrap_or(defaults.words_per_minute),
            segment_concurrency: env_parse::<usize>("READIO_SEGMENT_CONCURRENCY")
                .map(|n| n.max(1))
                .unwrap_or(defaults.segment_concurrency),
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn with_max_chunk_length(mut self, n: usize) -> Self {
        self.max_chunk_length = n.max(1);
        self
    }

    pub fn with_segment_concurrency(mut self, n: usize) -> Self {
        self.segment_concurrency = n.max(1);
        self
    }
}

/// Credentials and endpoints for the external collaborators.
#[derive(Debug, Clone)]
pub struct Settings {
    pub synthesis: SynthesisOptions,
    pub http: HttpClientConfig,
    pub playht_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub aws_region: String,
    pub llm_base_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            synthesis: SynthesisOptions::from_env(),
            http: HttpClientConfig::from_env(),
            playht_api_key: env_string("PLAYHT_API_KEY"),
            elevenlabs_api_key: env_string("ELEVENLABS_API_KEY"),
            aws_region: env_string("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            llm_base_url: env_string("LLAMA4_API_BASE"),
            llm_api_key: env_string("LLAMA4_API_KEY"),
            llm_model: env_string("LLAMA4_MODEL"),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults() {
        let opts = SynthesisOptions::default();
        assert_eq!(opts.provider_timeout, Duration::from_secs(30));
        assert_eq!(opts.max_chunk_length, 150);
        assert_eq!(opts.words_per_minute, 150.0);
        assert_eq!(opts.segment_concurrency, 1);
    }

    #[test]
    fn test_builders_clamp_to_one() {
        let opts = SynthesisOptions::default()
            .with_max_chunk_length(0)
            .with_segment_concurrency(0);
        assert_eq!(opts.max_chunk_length, 1);
        assert_eq!(opts.segment_concurrency, 1);
    }
}

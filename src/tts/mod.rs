//! TTS（文字转语音）模块：各 Provider 客户端与统一的合成接口。
//!
//! Speech providers behind one async trait, plus the registry used to wire them
//! into the synthesizer.

mod elevenlabs;
mod playht;
mod polly;
mod provider;
mod types;

pub use elevenlabs::{ElevenLabsProvider, ElevenLabsProviderBuilder};
pub use playht::{PlayHtProvider, PlayHtProviderBuilder};
pub use polly::{PollyProvider, PollyVoice};
pub use provider::{ProviderRegistry, SpeechProvider};
pub use types::{AudioFormat, AudioOutput, SpeechRequest};

use crate::config::Settings;
use crate::transport::build_http_client;
use crate::Result;
use std::sync::Arc;

/// Register every provider whose credentials are configured.
///
/// PlayHT and ElevenLabs need an API key; Polly uses the AWS credential chain and
/// is always registered.
pub async fn registry_from_settings(settings: &Settings) -> Result<ProviderRegistry> {
    let http = build_http_client(&settings.http)?;
    let mut registry = ProviderRegistry::new();

    match &settings.playht_api_key {
        Some(key) => {
            let p = PlayHtProvider::builder()
                .api_key(key.clone())
                .http_client(http.clone())
                .build()?;
            registry = registry.register(Arc::new(p));
        }
        None => tracing::info!(provider = "playht", "PLAYHT_API_KEY not set, provider disabled"),
    }

    match &settings.elevenlabs_api_key {
        Some(key) => {
            let p = ElevenLabsProvider::builder()
                .api_key(key.clone())
                .http_client(http.clone())
                .build()?;
            registry = registry.register(Arc::new(p));
        }
        None => tracing::info!(
            provider = "elevenlabs",
            "ELEVENLABS_API_KEY not set, provider disabled"
        ),
    }

    let polly = PollyProvider::from_region(settings.aws_region.clone()).await;
    registry = registry.register(Arc::new(polly));

    Ok(registry)
}

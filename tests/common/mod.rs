//! Scripted providers and catalogs shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use readio::config::{VoiceProfile, VoiceStyle};
use readio::tts::{AudioFormat, ProviderRegistry};
use readio::{
    AudioOutput, Error, ProviderId, SpeechProvider, SpeechRequest, StyleName, SynthesisOptions,
    VoiceCatalog,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted provider does on every call.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Answer with a URL derived from the request text.
    Url,
    /// Answer with bytes equal to the request text.
    Bytes,
    Empty,
    Fail(u16),
    /// Sleep longer than any test timeout, then answer.
    Hang(Duration),
    /// Fail only when the request text contains the marker.
    FailOn(String),
    /// Answer with a body that cannot be decoded.
    Garbled,
}

pub struct ScriptedProvider {
    id: ProviderId,
    behavior: Behavior,
    delay: Option<fn(&str) -> Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<SpeechRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: ProviderId, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            id,
            behavior,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Each call first sleeps for `delay(text)`.
    pub fn with_delay(
        id: ProviderId,
        behavior: Behavior,
        delay: fn(&str) -> Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            behavior,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn synthesize(&self, request: &SpeechRequest) -> readio::Result<AudioOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(&request.text)).await;
        }
        match &self.behavior {
            Behavior::Url => Ok(AudioOutput::url(format!(
                "https://cdn.test/{}/{}.mp3",
                self.id,
                request.text.len()
            ))),
            Behavior::Bytes => Ok(AudioOutput::bytes(
                request.text.clone().into_bytes(),
                AudioFormat::Mp3,
            )),
            Behavior::Empty => Ok(AudioOutput::url("")),
            Behavior::Garbled => Err(Error::Encoding("unreadable audio stream".into())),
            Behavior::Fail(status) => Err(Error::remote(*status, "scripted failure", self.id.as_str())),
            Behavior::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok(AudioOutput::url("https://cdn.test/late.mp3"))
            }
            Behavior::FailOn(marker) => {
                if request.text.contains(marker.as_str()) {
                    Err(Error::remote(503, "scripted failure", self.id.as_str()))
                } else {
                    Ok(AudioOutput::bytes(
                        request.text.clone().into_bytes(),
                        AudioFormat::Mp3,
                    ))
                }
            }
        }
    }
}

/// Style with a voice for every provider in `ids`.
pub fn style_for(ids: &[ProviderId]) -> VoiceStyle {
    ids.iter().fold(VoiceStyle::new(), |style, id| {
        style.with_voice(*id, VoiceProfile::new(format!("{}-voice", id)))
    })
}

/// Catalog with `professional` (default, all providers) plus any extra styles.
pub fn catalog(
    providers: &[ProviderId],
    segment_provider: Option<ProviderId>,
    extra: Vec<(&str, VoiceStyle)>,
) -> Arc<VoiceCatalog> {
    let mut styles = BTreeMap::new();
    styles.insert(StyleName::new("professional"), style_for(providers));
    for (name, style) in extra {
        styles.insert(StyleName::new(name), style);
    }
    Arc::new(
        VoiceCatalog::new(
            StyleName::new("professional"),
            providers.to_vec(),
            segment_provider,
            styles,
        )
        .unwrap(),
    )
}

pub fn registry(providers: &[Arc<ScriptedProvider>]) -> ProviderRegistry {
    providers.iter().fold(ProviderRegistry::new(), |r, p| {
        r.register(p.clone() as Arc<dyn SpeechProvider>)
    })
}

pub fn fast_options() -> SynthesisOptions {
    SynthesisOptions::default().with_provider_timeout(Duration::from_millis(200))
}

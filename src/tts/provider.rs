//! Speech provider trait and the registry the synthesizer draws from.

use super::types::{AudioOutput, SpeechRequest};
use crate::config::ProviderId;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A speech-synthesis backend.
///
/// Implementations make exactly one attempt per call; retries and fallback are
/// decided by the caller.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn synthesize(&self, request: &SpeechRequest) -> Result<AudioOutput>;
}

/// Providers available to this process, keyed by id.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn SpeechProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own id, replacing any previous one.
    pub fn register(mut self, provider: Arc<dyn SpeechProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn get(&self, id: ProviderId) -> Option<&Arc<dyn SpeechProvider>> {
        self.providers.get(&id)
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    /// Registered ids in a stable order.
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids: Vec<_> = self.providers.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}

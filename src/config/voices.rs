//! Voice catalog: narration styles mapped to per-provider voice identifiers.
//!
//! The catalog is loaded once at startup and validated as a whole, so an unknown
//! provider key or a dangling default style is a load-time error rather than a
//! missing entry discovered mid-request.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const BUILTIN_CATALOG: &str = include_str!("../../config/voices.yaml");

/// Environment variable pointing at a voice catalog YAML file.
pub const VOICE_CONFIG_ENV: &str = "READIO_VOICE_CONFIG";

/// Speech backends readio knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    PlayHt,
    ElevenLabs,
    Polly,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::PlayHt, ProviderId::ElevenLabs, ProviderId::Polly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayHt => "playht",
            Self::ElevenLabs => "elevenlabs",
            Self::Polly => "polly",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::configuration_with_context(
                    format!("unknown speech provider '{}'", s),
                    ErrorContext::new().with_details("expected one of: playht, elevenlabs, polly"),
                )
            })
    }
}

/// Name of a voice style, e.g. `professional`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleName(String);

impl StyleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StyleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-specific voice identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete voice on one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub voice_id: VoiceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl VoiceProfile {
    pub fn new(voice_id: impl Into<String>) -> Self {
        Self {
            voice_id: VoiceId::new(voice_id),
            engine: None,
            language_code: None,
        }
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
        self.language_code = Some(code.into());
        self
    }
}

impl<'de> Deserialize<'de> for VoiceProfile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Full {
            voice_id: String,
            #[serde(default)]
            engine: Option<String>,
            #[serde(default)]
            language_code: Option<String>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Input {
            // Shorthand: polly: Joanna
            Id(String),
            Obj(Full),
        }

        match Input::deserialize(deserializer)? {
            Input::Id(id) => Ok(VoiceProfile::new(id)),
            Input::Obj(full) => Ok(VoiceProfile {
                voice_id: VoiceId::new(full.voice_id),
                engine: full.engine,
                language_code: full.language_code,
            }),
        }
    }
}

/// One catalog entry: a narration tone and its voices per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub voices: BTreeMap<ProviderId, VoiceProfile>,
}

impl VoiceStyle {
    pub fn new() -> Self {
        Self {
            display_name: None,
            description: None,
            voices: BTreeMap::new(),
        }
    }

    pub fn with_voice(mut self, provider: ProviderId, voice: VoiceProfile) -> Self {
        self.voices.insert(provider, voice);
        self
    }

    pub fn voice_for(&self, provider: ProviderId) -> Option<&VoiceProfile> {
        self.voices.get(&provider)
    }
}

impl Default for VoiceStyle {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of looking up a requested style.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedStyle<'a> {
    pub name: &'a StyleName,
    pub style: &'a VoiceStyle,
    /// True when the requested style was absent or unknown and the default was used.
    pub used_default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    default_style: StyleName,
    providers: Vec<ProviderId>,
    segment_provider: Option<ProviderId>,
    styles: BTreeMap<StyleName, VoiceStyle>,
}

/// Validated, immutable voice catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceCatalog {
    default_style: StyleName,
    providers: Vec<ProviderId>,
    segment_provider: ProviderId,
    styles: BTreeMap<StyleName, VoiceStyle>,
}

impl VoiceCatalog {
    /// Build and validate a catalog.
    ///
    /// `segment_provider` defaults to the last provider in the fallback order.
    pub fn new(
        default_style: StyleName,
        providers: Vec<ProviderId>,
        segment_provider: Option<ProviderId>,
        styles: BTreeMap<StyleName, VoiceStyle>,
    ) -> Result<Self> {
        if styles.is_empty() {
            return Err(invalid("catalog defines no voice styles", "styles"));
        }
        if !styles.contains_key(&default_style) {
            return Err(invalid(
                format!("default style '{}' is not defined", default_style),
                "default_style",
            ));
        }
        if providers.is_empty() {
            return Err(invalid("provider fallback list is empty", "providers"));
        }
        let mut seen = HashSet::new();
        for p in &providers {
            if !seen.insert(*p) {
                return Err(invalid(
                    format!("provider '{}' listed more than once", p),
                    "providers",
                ));
            }
        }
        let segment_provider = match segment_provider {
            Some(p) if providers.contains(&p) => p,
            Some(p) => {
                return Err(invalid(
                    format!("segment provider '{}' is not in the provider list", p),
                    "segment_provider",
                ))
            }
            None => providers[providers.len() - 1],
        };
        for (name, style) in &styles {
            if style.voices.is_empty() {
                return Err(invalid(
                    format!("style '{}' has no voices", name),
                    format!("styles.{}.voices", name),
                ));
            }
            for (provider, voice) in &style.voices {
                if voice.voice_id.as_str().trim().is_empty() {
                    return Err(invalid(
                        format!("style '{}' has an empty voice id", name),
                        format!("styles.{}.voices.{}", name, provider),
                    ));
                }
            }
        }

        Ok(Self {
            default_style,
            providers,
            segment_provider,
            styles,
        })
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(
            file.default_style,
            file.providers,
            file.segment_provider,
            file.styles,
        )
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to read voice catalog: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("voice_catalog"),
            )
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from `READIO_VOICE_CONFIG` when set, otherwise the builtin catalog.
    pub fn from_env() -> Result<Self> {
        match std::env::var(VOICE_CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path),
            _ => Self::builtin(),
        }
    }

    /// A copy of this catalog whose fallback order keeps only `available` providers.
    ///
    /// Voices for dropped providers stay in the style table; they are simply never
    /// reached. Fails if nothing is left or the segment provider was dropped.
    pub fn retain_providers(&self, available: &[ProviderId]) -> Result<Self> {
        let providers: Vec<ProviderId> = self
            .providers
            .iter()
            .copied()
            .filter(|p| available.contains(p))
            .collect();
        Self::new(
            self.default_style.clone(),
            providers,
            Some(self.segment_provider),
            self.styles.clone(),
        )
    }

    pub fn default_style(&self) -> &StyleName {
        &self.default_style
    }

    /// Providers in fallback priority order.
    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    /// Provider used for segmented synthesis.
    pub fn segment_provider(&self) -> ProviderId {
        self.segment_provider
    }

    pub fn style(&self, name: &str) -> Option<&VoiceStyle> {
        self.styles.get(name)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&StyleName, &VoiceStyle)> {
        self.styles.iter()
    }

    /// Look up a style, substituting the default when absent or unknown.
    pub fn resolve(&self, requested: Option<&str>) -> ResolvedStyle<'_> {
        if let Some(name) = requested {
            if let Some((key, style)) = self.styles.get_key_value(name) {
                return ResolvedStyle {
                    name: key,
                    style,
                    used_default: false,
                };
            }
        }
        let (name, style) = self
            .styles
            .get_key_value(&self.default_style)
            .expect("default style is checked at construction");
        ResolvedStyle {
            name,
            style,
            used_default: true,
        }
    }
}

fn invalid(msg: impl Into<String>, field: impl Into<String>) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("voice_catalog"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = VoiceCatalog::builtin().unwrap();
        assert_eq!(catalog.default_style().as_str(), "professional");
        assert_eq!(
            catalog.providers(),
            &[ProviderId::PlayHt, ProviderId::ElevenLabs, ProviderId::Polly]
        );
        assert_eq!(catalog.segment_provider(), ProviderId::Polly);
        let polly = catalog
            .style("professional")
            .and_then(|s| s.voice_for(ProviderId::Polly))
            .unwrap();
        assert_eq!(polly.voice_id.as_str(), "Salli");
        assert_eq!(polly.engine.as_deref(), Some("neural"));
    }

    #[test]
    fn test_shorthand_voice_entry() {
        let catalog = VoiceCatalog::builtin().unwrap();
        let eleven = catalog
            .style("calm_senior")
            .and_then(|s| s.voice_for(ProviderId::ElevenLabs))
            .unwrap();
        assert_eq!(eleven.voice_id.as_str(), "EXAVITQu4vr4xnSDxMaL");
        assert!(eleven.engine.is_none());
    }

    #[test]
    fn test_resolve_unknown_style_uses_default() {
        let catalog = VoiceCatalog::builtin().unwrap();
        let resolved = catalog.resolve(Some("whispering_ghost"));
        assert_eq!(resolved.name.as_str(), "professional");
        assert!(resolved.used_default);

        let resolved = catalog.resolve(None);
        assert!(resolved.used_default);

        let resolved = catalog.resolve(Some("casual"));
        assert_eq!(resolved.name.as_str(), "casual");
        assert!(!resolved.used_default);
    }

    #[test]
    fn test_retain_providers() {
        let catalog = VoiceCatalog::builtin().unwrap();
        let trimmed = catalog
            .retain_providers(&[ProviderId::Polly, ProviderId::PlayHt])
            .unwrap();
        assert_eq!(trimmed.providers(), &[ProviderId::PlayHt, ProviderId::Polly]);

        let err = catalog.retain_providers(&[ProviderId::PlayHt]).unwrap_err();
        assert!(err.to_string().contains("segment provider"));
    }

    #[test]
    fn test_provider_id_parsing() {
        assert_eq!("PlayHT".parse::<ProviderId>().unwrap(), ProviderId::PlayHt);
        assert_eq!(" polly ".parse::<ProviderId>().unwrap(), ProviderId::Polly);
        assert!("azure".parse::<ProviderId>().is_err());
    }
}

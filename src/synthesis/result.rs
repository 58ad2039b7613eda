//! Synthesis result types returned to callers.

use crate::config::{ProviderId, StyleName, VoiceId};
use crate::error_code::FailureKind;
use crate::tts::AudioOutput;
use serde::Serialize;

/// One synthesized chunk of a script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptSegment {
    /// Position in the script, contiguous from 0.
    pub index: usize,
    pub text: String,
    pub audio: AudioOutput,
    pub estimated_duration_seconds: f64,
}

/// Why a synthesis request produced no audio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisFailure {
    pub kind: FailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Outcome of one synthesis request.
///
/// On success `error` is `None`; on failure `segments` is empty and
/// `provider_used` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_used: Option<ProviderId>,
    pub voice_style: StyleName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<VoiceId>,
    pub segments: Vec<ScriptSegment>,
    pub total_duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SynthesisFailure>,
}

impl SynthesisResult {
    pub(crate) fn succeeded(
        provider: ProviderId,
        voice_style: StyleName,
        voice_id: VoiceId,
        segments: Vec<ScriptSegment>,
    ) -> Self {
        let total_duration_seconds = segments
            .iter()
            .map(|s| s.estimated_duration_seconds)
            .sum();
        Self {
            success: true,
            provider_used: Some(provider),
            voice_style,
            voice_id: Some(voice_id),
            segments,
            total_duration_seconds,
            error: None,
        }
    }

    pub(crate) fn failed(voice_style: StyleName, kind: FailureKind, message: Option<String>) -> Self {
        Self {
            success: false,
            provider_used: None,
            voice_style,
            voice_id: None,
            segments: Vec::new(),
            total_duration_seconds: 0.0,
            error: Some(SynthesisFailure { kind, message }),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// URL of the first segment, for providers that host the audio.
    pub fn audio_url(&self) -> Option<&str> {
        self.segments.first().and_then(|s| s.audio.as_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::AudioFormat;

    fn segment(index: usize, secs: f64) -> ScriptSegment {
        ScriptSegment {
            index,
            text: format!("segment {}", index),
            audio: AudioOutput::bytes(vec![0u8; 4], AudioFormat::Mp3),
            estimated_duration_seconds: secs,
        }
    }

    #[test]
    fn test_total_duration_is_sum_of_segments() {
        let r = SynthesisResult::succeeded(
            ProviderId::Polly,
            StyleName::new("professional"),
            VoiceId::new("Salli"),
            vec![segment(0, 1.5), segment(1, 2.0)],
        );
        assert!(r.success);
        assert_eq!(r.total_duration_seconds, 3.5);
        assert!(r.failure_kind().is_none());
    }

    #[test]
    fn test_failure_serialization_omits_provider() {
        let r = SynthesisResult::failed(StyleName::new("casual"), FailureKind::Exhausted, None);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("provider_used").is_none());
        assert_eq!(json["error"]["kind"], "exhausted");
        assert!(json["error"].get("message").is_none());
    }
}

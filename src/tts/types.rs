//! TTS (Text-to-Speech) types.

use crate::config::VoiceProfile;
use base64::Engine as _;
use bytes::Bytes;
use serde::{Serialize, Serializer};

/// Supported audio formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Ogg,
    Pcm,
    Wav,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Pcm => "audio/pcm",
            Self::Wav => "audio/wav",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Pcm => "pcm",
            Self::Wav => "wav",
        }
    }

    /// Guess a format from a `Content-Type` header value, defaulting to mp3.
    pub fn from_content_type(s: &str) -> Self {
        let s = s.to_ascii_lowercase();
        if s.contains("ogg") || s.contains("opus") {
            Self::Ogg
        } else if s.contains("wav") {
            Self::Wav
        } else if s.contains("pcm") {
            Self::Pcm
        } else {
            Self::Mp3
        }
    }
}

/// Audio produced by a provider: raw bytes, or a URL the provider hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudioOutput {
    Bytes {
        #[serde(serialize_with = "serialize_base64")]
        data: Bytes,
        format: AudioFormat,
    },
    Url {
        url: String,
    },
}

impl AudioOutput {
    pub fn bytes(data: impl Into<Bytes>, format: AudioFormat) -> Self {
        Self::Bytes {
            data: data.into(),
            format,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// An empty output never counts as a successful synthesis.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes { data, .. } => data.is_empty(),
            Self::Url { url } => url.trim().is_empty(),
        }
    }

    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url { url } => Some(url),
            Self::Bytes { .. } => None,
        }
    }
}

fn serialize_base64<S: Serializer>(data: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

/// One synthesis call: text plus the voice to speak it in.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceProfile,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, voice: VoiceProfile) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}

//! 合成失败分类：为每种失败定义稳定的错误码及其回退语义。
//!
//! Typed failure kinds for speech synthesis.
//!
//! Callers branch on [`FailureKind`] instead of parsing error messages. Each kind
//! carries a stable code string and a flag telling whether the next provider in
//! the fallback order is worth trying.
//!
//! | Code   | Kind                  | Fallbackable |
//! |--------|-----------------------|--------------|
//! | T1001  | config_error          | no           |
//! | T2001  | provider_unavailable  | yes          |
//! | T2002  | timeout               | yes          |
//! | T2003  | empty_audio           | yes          |
//! | T3001  | encoding_error        | no           |
//! | T9001  | exhausted             | no           |
//!
//! ## Example
//!
//! ```rust
//! use readio::error_code::FailureKind;
//!
//! let kind = FailureKind::from_http_status(429);
//! assert_eq!(kind.code(), "T2001");
//! assert!(kind.fallbackable());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a synthesis attempt (or a whole synthesis request) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// T1001: Voice catalog or provider registry is inconsistent
    ConfigError,
    /// T2001: Provider rejected the request or could not be reached
    ProviderUnavailable,
    /// T2002: Provider did not answer within the per-call timeout
    Timeout,
    /// T2003: Provider answered successfully but without audio
    EmptyAudio,
    /// T3001: Local encoding, decoding, or file I/O failed
    EncodingError,
    /// T9001: Every configured provider was tried and none produced audio
    Exhausted,
}

impl FailureKind {
    /// Returns the stable code string (e.g., `"T2002"`).
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "T1001",
            Self::ProviderUnavailable => "T2001",
            Self::Timeout => "T2002",
            Self::EmptyAudio => "T2003",
            Self::EncodingError => "T3001",
            Self::Exhausted => "T9001",
        }
    }

    /// Returns the snake_case name (e.g., `"provider_unavailable"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigError => "config_error",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::Timeout => "timeout",
            Self::EmptyAudio => "empty_audio",
            Self::EncodingError => "encoding_error",
            Self::Exhausted => "exhausted",
        }
    }

    /// Whether the failure comes from the provider's side rather than from the
    /// request or local setup.
    ///
    /// Informational only: fallback synthesis moves to the next provider after
    /// every failure kind.
    #[inline]
    pub fn fallbackable(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable | Self::Timeout | Self::EmptyAudio
        )
    }

    /// Maps an HTTP status code returned by a provider to a failure kind.
    ///
    /// Every non-success status from a provider is treated as that provider being
    /// unavailable, except the timeout statuses.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            408 | 504 => Self::Timeout,
            _ => Self::ProviderUnavailable,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

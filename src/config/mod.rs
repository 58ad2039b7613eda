//! 配置模块：语音目录（风格 → 各 Provider 的音色）与环境变量设置。
//!
//! Configuration: the voice catalog (style → per-provider voice) and
//! environment-driven settings. Both are loaded once at process start and never
//! mutated afterwards.

mod settings;
mod voices;

pub use settings::{Settings, SynthesisOptions};
pub use voices::{
    ProviderId, ResolvedStyle, StyleName, VoiceCatalog, VoiceId, VoiceProfile, VoiceStyle,
    VOICE_CONFIG_ENV,
};

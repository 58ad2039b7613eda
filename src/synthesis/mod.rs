//! 语音合成核心：按 Provider 优先级回退合成、分段合成与时长估算。
//!
//! Speech synthesis core.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`SpeechSynthesizer`] | Fallback and segmented synthesis over the provider registry |
//! | [`SynthesisResult`] | Per-request outcome, success or typed failure |
//! | [`ScriptSegment`] | One synthesized chunk with its duration estimate |
//! | [`estimate_duration`] | Words-per-minute duration model |

mod duration;
mod result;
mod synthesizer;

pub use duration::estimate_duration;
pub use result::{ScriptSegment, SynthesisFailure, SynthesisResult};
pub use synthesizer::SpeechSynthesizer;

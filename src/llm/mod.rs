//! 文本生成：通过 OpenAI 兼容接口进行候选重排与旁白脚本撰写。
//!
//! Text generation seam. The pipeline receives an `Arc<dyn TextGenerator>`
//! built once at the composition root.

mod client;

pub use client::{ChatClient, ChatClientBuilder};

use crate::Result;
use async_trait::async_trait;

/// Single-prompt text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the generated text, or an empty string when the model returned none.
    async fn complete(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String>;
}

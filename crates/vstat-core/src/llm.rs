//! LLM provider trait and completion settings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Result;

/// Settings for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        // Low temperature keeps SQL generation deterministic
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.1,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for LLM providers (e.g. OpenAI)
///
/// The orchestrator treats the provider as an opaque completion function:
/// prompt in, raw model text (expected to be a JSON object) or an error out.
/// Implementations must not panic on transport failures.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one chat completion round trip and return the raw model output
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

use serde::{Deserialize, Serialize};

use crate::PaperSiftError;

/// Seed sent with every request so identical prompts tend to reproduce output.
pub const DEFAULT_SEED: i64 = 0;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub seed: i64,
}

impl LlmRequest {
    /// A single user message with deterministic sampling.
    pub fn deterministic(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            temperature: 0.0,
            seed: DEFAULT_SEED,
        }
    }
}

/// Token consumption reported by the provider for one call.
///
/// `cached_tokens` is the subset of `prompt_tokens` served from the provider's
/// prompt cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    #[serde(default)]
    pub cached_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    pub usage: TokenUsage,
}

/// A text-completion backend: one request in, generated text plus usage out.
#[async_trait::async_trait]
pub trait CompletionLlm: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PaperSiftError>;
}

#[async_trait::async_trait]
impl<T> CompletionLlm for std::sync::Arc<T>
where
    T: CompletionLlm + ?Sized,
{
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PaperSiftError> {
        (**self).complete(request).await
    }
}

mod gateway;
pub mod rate_limit;

// OpenAI-compatible client (the only backend the pipeline ships with)
pub mod openai_compatible;

pub use gateway::{Completion, LlmGateway, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
pub use openai_compatible::{
    ChatCompletionRequest, OpenAiCompatibleBuilder, OpenAiCompatibleClient, OPENAI_BASE_URL,
};
pub use papersift_core::{CompletionLlm, LlmRequest, LlmResponse, Message, Role, TokenUsage};
pub use rate_limit::{Clock, RateLimiter, SystemClock};

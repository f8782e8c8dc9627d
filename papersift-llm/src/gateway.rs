use std::sync::Arc;
use std::time::Duration;

use papersift_core::{is_retryable, CompletionLlm, LlmRequest, PaperSiftError, TokenUsage};

use crate::rate_limit::{Clock, RateLimiter};

pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Generated text together with the usage the provider billed for it.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Single entry point for every model call in a run.
///
/// Each attempt first takes a slot from the rate limiter, then sends one
/// deterministic request. Transport and service failures are retried with a
/// fixed delay; anything else is returned immediately.
pub struct LlmGateway {
    llm: Arc<dyn CompletionLlm>,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
    max_attempts: usize,
    retry_delay: Duration,
}

impl LlmGateway {
    pub fn new(llm: Arc<dyn CompletionLlm>, limiter: RateLimiter) -> Self {
        let clock = limiter.clock();
        Self {
            llm,
            limiter: Arc::new(limiter),
            clock,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_policy(mut self, max_attempts: usize, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay = retry_delay;
        self
    }

    pub async fn call(&self, prompt: &str, model: &str) -> Result<Completion, PaperSiftError> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.acquire().await;

            let error = match self.llm.complete(LlmRequest::deterministic(model, prompt)).await {
                Ok(response) => {
                    return Ok(Completion {
                        text: response.content,
                        usage: response.usage,
                    })
                }
                Err(error) if !is_retryable(&error) => return Err(error),
                Err(error) => error,
            };

            tracing::warn!(attempt, max_attempts, error = %error, "LLM call failed");

            if attempt >= max_attempts {
                tracing::error!(attempts = attempt, error = %error, "giving up on LLM call");
                return Err(PaperSiftError::MaxRetriesExceeded {
                    max: max_attempts,
                    last: error.to_string(),
                });
            }

            self.clock.sleep(self.retry_delay).await;
        }
    }
}

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaperSiftError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Max retries ({max}) exceeded, last error: {last}")]
    MaxRetriesExceeded { max: usize, last: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Whether a failed LLM call is worth sending again unchanged.
pub fn is_retryable(error: &PaperSiftError) -> bool {
    matches!(
        error,
        PaperSiftError::LlmProvider(_) | PaperSiftError::Timeout(_)
    )
}

use papersift_core::{BatchSizing, Cutoffs, PaperSiftError};
use serde::{Deserialize, Serialize};

/// Knobs for the filtering stages. Every field has a default so partial
/// configuration files deserialize.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub model: String,
    pub run_title_filter: bool,
    pub run_abstract_filter: bool,
    pub title_batch_size: usize,
    pub abstract_batch_size: usize,
    pub adaptive_batch_size: bool,
    pub adaptive_threshold: usize,
    pub title_retry: usize,
    pub abstract_retry: usize,
    /// Requests per minute; zero or negative disables limiting.
    pub limit_per_minute: i64,
    pub relevance_cutoff: i64,
    pub novelty_cutoff: i64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            run_title_filter: true,
            run_abstract_filter: true,
            title_batch_size: 50,
            abstract_batch_size: 10,
            adaptive_batch_size: false,
            adaptive_threshold: 200,
            title_retry: 3,
            abstract_retry: 3,
            limit_per_minute: 0,
            relevance_cutoff: 5,
            novelty_cutoff: 5,
        }
    }
}

impl FilterConfig {
    pub fn uses_llm(&self) -> bool {
        self.run_title_filter || self.run_abstract_filter
    }

    pub fn title_sizing(&self) -> BatchSizing {
        BatchSizing {
            base: self.title_batch_size,
            adaptive: self.adaptive_batch_size,
            threshold: self.adaptive_threshold,
        }
    }

    pub fn abstract_sizing(&self) -> BatchSizing {
        BatchSizing {
            base: self.abstract_batch_size,
            adaptive: self.adaptive_batch_size,
            threshold: self.adaptive_threshold,
        }
    }

    pub fn cutoffs(&self) -> Cutoffs {
        Cutoffs {
            relevance_min: self.relevance_cutoff,
            novelty_min: self.novelty_cutoff,
        }
    }

    pub fn validate(&self) -> Result<(), PaperSiftError> {
        if self.uses_llm() && self.model.trim().is_empty() {
            return Err(PaperSiftError::InvalidConfig(
                "model must be set when an LLM filter is enabled".to_string(),
            ));
        }
        if self.title_batch_size == 0 || self.abstract_batch_size == 0 {
            tracing::warn!("batch size of zero configured, using one");
        }
        Ok(())
    }
}

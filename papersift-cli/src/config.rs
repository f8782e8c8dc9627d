//! `papersift.toml` loading.
//!
//! Sections mirror the pipeline: `[selection]` for batching and model
//! choice, `[filtering]` for score cutoffs, `[output]` for where reports go,
//! `[llm]` for the provider connection and `[pricing.<model>]` for extra or
//! overriding token prices. Every field is optional.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use papersift_core::{ModelPrice, PricingTable};
use papersift_filter::FilterConfig;
use papersift_llm::{DEFAULT_MAX_ATTEMPTS, OPENAI_BASE_URL};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub model: String,
    pub run_title_filter: bool,
    pub run_abstract_filter: bool,
    pub title_batch_size: usize,
    pub abstract_batch_size: usize,
    pub adaptive_batch_size: bool,
    pub adaptive_threshold: usize,
    pub title_retry: usize,
    pub abstract_retry: usize,
    pub limit_per_minute: i64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        let defaults = FilterConfig::default();
        Self {
            model: defaults.model,
            run_title_filter: defaults.run_title_filter,
            run_abstract_filter: defaults.run_abstract_filter,
            title_batch_size: defaults.title_batch_size,
            abstract_batch_size: defaults.abstract_batch_size,
            adaptive_batch_size: defaults.adaptive_batch_size,
            adaptive_threshold: defaults.adaptive_threshold,
            title_retry: defaults.title_retry,
            abstract_retry: defaults.abstract_retry,
            limit_per_minute: defaults.limit_per_minute,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    pub relevance_cutoff: i64,
    pub novelty_cutoff: i64,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        let defaults = FilterConfig::default();
        Self {
            relevance_cutoff: defaults.relevance_cutoff,
            novelty_cutoff: defaults.novelty_cutoff,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: PathBuf,
    pub dump_json: bool,
    pub dump_debug_file: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("out"),
            dump_json: true,
            dump_debug_file: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: usize,
    pub retry_delay_secs: u64,
    /// Only ever taken from the environment.
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            timeout_secs: 120,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_secs: 2,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub selection: SelectionConfig,
    pub filtering: FilteringConfig,
    pub output: OutputConfig,
    pub llm: LlmConfig,
    pub pricing: BTreeMap<String, ModelPrice>,
}

impl AppConfig {
    /// Reads `path`, or starts from defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            tracing::info!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings the filter config does not cover.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.llm.max_attempts == 0 {
            anyhow::bail!("llm.max_attempts must be at least 1");
        }
        Ok(())
    }

    /// Applies `OPENAI_API_KEY` and `OPENAI_BASE_URL` from `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            self.llm.api_key = Some(SecretString::new(key));
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.llm.base_url = url;
        }
        self
    }

    pub fn filter_config(&self) -> FilterConfig {
        let selection = &self.selection;
        FilterConfig {
            model: selection.model.clone(),
            run_title_filter: selection.run_title_filter,
            run_abstract_filter: selection.run_abstract_filter,
            title_batch_size: selection.title_batch_size,
            abstract_batch_size: selection.abstract_batch_size,
            adaptive_batch_size: selection.adaptive_batch_size,
            adaptive_threshold: selection.adaptive_threshold,
            title_retry: selection.title_retry,
            abstract_retry: selection.abstract_retry,
            limit_per_minute: selection.limit_per_minute,
            relevance_cutoff: self.filtering.relevance_cutoff,
            novelty_cutoff: self.filtering.novelty_cutoff,
        }
    }

    /// Built-in prices with the `[pricing]` entries layered on top.
    pub fn pricing_table(&self) -> PricingTable {
        let mut table = PricingTable::default();
        table.extend(self.pricing.clone());
        table
    }
}

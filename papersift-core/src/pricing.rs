//! Per-model token prices and run-level cost accounting.
//!
//! Rates are dollars per million tokens, looked up by exact model name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::TokenUsage;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct ModelPrice {
    pub prompt: f64,
    pub completion: f64,
    /// Rate for cached prompt tokens; falls back to `prompt` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<f64>,
}

impl ModelPrice {
    pub const fn new(prompt: f64, completion: f64, cache: Option<f64>) -> Self {
        Self {
            prompt,
            completion,
            cache,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CallCost {
    pub prompt_cost: f64,
    pub completion_cost: f64,
}

const PER_MILLION: f64 = 1_000_000.0;

const BUILTIN_PRICES: &[(&str, ModelPrice)] = &[
    ("gpt-4.1", ModelPrice::new(2.0, 8.0, Some(0.5))),
    ("gpt-4.1-2025-04-14", ModelPrice::new(2.0, 8.0, Some(0.5))),
    ("gpt-4.1-mini", ModelPrice::new(0.4, 1.6, Some(0.1))),
    ("gpt-4.1-mini-2025-04-14", ModelPrice::new(0.4, 1.6, Some(0.1))),
    ("gpt-4.1-nano", ModelPrice::new(0.1, 0.4, Some(0.025))),
    ("gpt-4.1-nano-2025-04-14", ModelPrice::new(0.1, 0.4, Some(0.025))),
    ("gpt-4o", ModelPrice::new(2.5, 10.0, Some(1.25))),
    ("gpt-4o-2024-08-06", ModelPrice::new(2.5, 10.0, Some(1.25))),
    ("gpt-4o-2024-11-20", ModelPrice::new(2.5, 10.0, Some(1.25))),
    ("gpt-4o-2024-05-13", ModelPrice::new(5.0, 15.0, None)),
    ("gpt-4o-mini", ModelPrice::new(0.15, 0.6, Some(0.075))),
    ("gpt-4o-mini-2024-07-18", ModelPrice::new(0.15, 0.6, Some(0.075))),
    ("o1", ModelPrice::new(15.0, 60.0, Some(7.5))),
    ("o1-mini", ModelPrice::new(1.1, 4.4, Some(0.55))),
    ("o3", ModelPrice::new(10.0, 40.0, Some(2.5))),
    ("o3-mini", ModelPrice::new(1.1, 4.4, Some(0.55))),
    ("o4-mini", ModelPrice::new(1.1, 4.4, Some(0.275))),
    ("gemini-2.0-flash", ModelPrice::new(0.1, 0.4, Some(0.0025))),
    ("gemini-1.5-flash", ModelPrice::new(0.075, 0.3, Some(0.01875))),
    ("gemini-1.5-flash-8b", ModelPrice::new(0.0375, 0.15, Some(0.01))),
    ("gemini-1.5-pro", ModelPrice::new(1.25, 5.0, Some(0.3125))),
    ("deepseek-chat", ModelPrice::new(0.14, 0.28, None)),
    ("deepseek-reasoner", ModelPrice::new(0.55, 2.19, None)),
    ("openai/gpt-4.1", ModelPrice::new(2.0, 8.0, Some(0.5))),
];

#[derive(Clone, Debug, PartialEq)]
pub struct PricingTable {
    prices: HashMap<String, ModelPrice>,
}

impl Default for PricingTable {
    fn default() -> Self {
        Self {
            prices: BUILTIN_PRICES
                .iter()
                .map(|(name, price)| (name.to_string(), *price))
                .collect(),
        }
    }
}

impl PricingTable {
    pub fn empty() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    pub fn with_price(mut self, model: impl Into<String>, price: ModelPrice) -> Self {
        self.prices.insert(model.into(), price);
        self
    }

    pub fn extend(&mut self, prices: impl IntoIterator<Item = (String, ModelPrice)>) {
        self.prices.extend(prices);
    }

    pub fn get(&self, model: &str) -> Option<&ModelPrice> {
        self.prices.get(model)
    }

    /// Cost of one call. Unknown models cost nothing and log a warning.
    pub fn cost(&self, model: &str, usage: &TokenUsage) -> CallCost {
        let Some(price) = self.prices.get(model) else {
            tracing::warn!(model, "model not found in pricing table, skipping cost calculation");
            return CallCost::default();
        };

        let cached = usage.cached_tokens.min(usage.prompt_tokens);
        let uncached = usage.prompt_tokens - cached;
        let cache_rate = price.cache.unwrap_or(price.prompt);

        CallCost {
            prompt_cost: (cache_rate * cached as f64 + price.prompt * uncached as f64)
                / PER_MILLION,
            completion_cost: price.completion * usage.completion_tokens as f64 / PER_MILLION,
        }
    }
}

/// Running token and dollar totals for one pipeline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostAccumulator {
    pub prompt_cost: f64,
    pub completion_cost: f64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl CostAccumulator {
    pub fn record(&mut self, usage: &TokenUsage, cost: CallCost) {
        self.prompt_cost += cost.prompt_cost.max(0.0);
        self.completion_cost += cost.completion_cost.max(0.0);
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
    }

    pub fn merge(&mut self, other: &CostAccumulator) {
        self.prompt_cost += other.prompt_cost;
        self.completion_cost += other.completion_cost;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }

    pub fn total_cost(&self) -> f64 {
        self.prompt_cost + self.completion_cost
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

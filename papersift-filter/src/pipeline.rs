use std::collections::{BTreeMap, HashSet};

use papersift_core::{
    sort_accepted, Accepted, Candidate, CostAccumulator, PaperSiftError, PricingTable, Rejection,
    ScoredRecord,
};
use papersift_llm::LlmGateway;
use papersift_prompt::PromptSet;
use serde::Serialize;

use crate::{filter_by_abstract, filter_by_title, FilterConfig, StageContext};

/// Everything one run produced.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PipelineReport {
    /// Best first: score, then relevance, then id.
    pub accepted: Vec<Accepted>,
    pub rejected: BTreeMap<String, Rejection>,
    /// Papers the abstract pass could not score within its retry budget.
    pub unresolved: Vec<Candidate>,
    pub cost: CostAccumulator,
    pub scored_batches: Vec<Vec<ScoredRecord>>,
}

pub struct Pipeline {
    gateway: LlmGateway,
    prompts: PromptSet,
    pricing: PricingTable,
    config: FilterConfig,
}

impl Pipeline {
    pub fn new(gateway: LlmGateway, prompts: PromptSet, config: FilterConfig) -> Self {
        Self {
            gateway,
            prompts,
            pricing: PricingTable::default(),
            config,
        }
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    fn context(&self) -> StageContext<'_> {
        StageContext {
            gateway: &self.gateway,
            prompts: &self.prompts,
            pricing: &self.pricing,
            model: &self.config.model,
        }
    }

    pub async fn run(&self, candidates: Vec<Candidate>) -> Result<PipelineReport, PaperSiftError> {
        self.config.validate()?;

        let candidates = dedupe(candidates);
        tracing::info!(papers = candidates.len(), model = %self.config.model, "starting filter pipeline");

        let mut report = PipelineReport::default();

        let survivors = if self.config.run_title_filter {
            let outcome = filter_by_title(
                self.context(),
                candidates,
                self.config.title_sizing(),
                self.config.title_retry,
            )
            .await?;
            report.cost.merge(&outcome.cost);
            insert_rejections(&mut report.rejected, outcome.rejected);
            outcome.kept
        } else {
            tracing::info!("title filter disabled, passing all papers through");
            candidates
        };

        if self.config.run_abstract_filter {
            let outcome = filter_by_abstract(
                self.context(),
                survivors,
                self.config.abstract_sizing(),
                self.config.cutoffs(),
                self.config.abstract_retry,
            )
            .await?;
            report.cost.merge(&outcome.cost);
            insert_rejections(&mut report.rejected, outcome.rejected);
            report.accepted = outcome.accepted;
            report.unresolved = outcome.unresolved;
            report.scored_batches = outcome.scored_batches;
        } else {
            tracing::info!("abstract filter disabled, accepting all remaining papers unscored");
            report.accepted = survivors.into_iter().map(Accepted::Unscored).collect();
        }

        sort_accepted(&mut report.accepted);

        if !report.unresolved.is_empty() {
            let ids: Vec<&str> = report.unresolved.iter().map(Candidate::id).collect();
            tracing::error!(
                count = ids.len(),
                ids = ?ids,
                "papers left unscored after exhausting retries"
            );
        }

        tracing::info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            unresolved = report.unresolved.len(),
            prompt_tokens = report.cost.prompt_tokens,
            completion_tokens = report.cost.completion_tokens,
            prompt_cost = report.cost.prompt_cost,
            completion_cost = report.cost.completion_cost,
            total_cost = report.cost.total_cost(),
            "filter pipeline finished"
        );

        Ok(report)
    }
}

fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let before = candidates.len();
    let unique: Vec<Candidate> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.id().to_string()))
        .collect();
    if unique.len() < before {
        tracing::warn!(dropped = before - unique.len(), "dropped duplicate paper ids");
    }
    unique
}

fn insert_rejections(map: &mut BTreeMap<String, Rejection>, rejections: Vec<Rejection>) {
    for rejection in rejections {
        map.insert(rejection.id().to_string(), rejection);
    }
}

//! Title pass: cheap removal of papers that are certainly off-topic.

use std::collections::HashSet;

use papersift_core::{
    batched, parse_id_list, resolve_with_retry, BatchSizing, Candidate, CostAccumulator,
    Exhaustion, PaperSiftError, PassOutput, PassResult, Rejection, ResolvingPass,
};

use crate::StageContext;

#[derive(Clone, Debug, Default)]
pub struct TitleOutcome {
    pub kept: Vec<Candidate>,
    pub rejected: Vec<Rejection>,
    pub cost: CostAccumulator,
}

impl PassOutput for TitleOutcome {
    type Item = Candidate;

    fn merge(&mut self, other: Self) {
        self.kept.extend(other.kept);
        self.rejected.extend(other.rejected);
        self.cost.merge(&other.cost);
    }

    fn keep_unresolved(&mut self, items: Vec<Candidate>) {
        self.kept.extend(items);
    }
}

pub struct TitlePass<'a> {
    context: StageContext<'a>,
    sizing: BatchSizing,
}

impl<'a> TitlePass<'a> {
    pub fn new(context: StageContext<'a>, sizing: BatchSizing) -> Self {
        Self { context, sizing }
    }
}

#[async_trait::async_trait]
impl ResolvingPass<Candidate> for TitlePass<'_> {
    type Output = TitleOutcome;

    async fn run_pass(
        &self,
        items: Vec<Candidate>,
    ) -> Result<PassResult<Candidate, TitleOutcome>, PaperSiftError> {
        let size = self.sizing.size_for(items.len());
        tracing::info!(papers = items.len(), batch_size = size, "title filtering");

        let mut outcome = TitleOutcome::default();
        let mut deferred = Vec::new();

        for batch in batched(&items, size) {
            let prompt = self.context.prompts.title_prompt(&batch);
            let completion = self.context.call(&prompt, &mut outcome.cost).await?;

            let listed: HashSet<String> = match parse_id_list(&completion.text) {
                Ok(ids) => ids.into_iter().collect(),
                Err(err) => {
                    tracing::warn!(
                        papers = batch.len(),
                        "failed to parse title filter output as a list, deferring batch"
                    );
                    tracing::debug!(error = %err, "unparsable title filter output");
                    deferred.extend(batch);
                    continue;
                }
            };

            for candidate in batch {
                if listed.contains(candidate.id()) {
                    tracing::info!(id = candidate.id(), title = candidate.title(), "filtered out by title");
                    outcome.rejected.push(Rejection::title_filtered(candidate));
                } else {
                    outcome.kept.push(candidate);
                }
            }
        }

        tracing::info!(
            rejected = outcome.rejected.len(),
            kept = outcome.kept.len(),
            deferred = deferred.len(),
            cost = outcome.cost.total_cost(),
            "title pass finished"
        );

        Ok(PassResult {
            output: outcome,
            unresolved: deferred,
        })
    }
}

/// Runs the title pass with retries. Candidates still unparsed once the
/// budget is spent are kept.
pub async fn filter_by_title(
    context: StageContext<'_>,
    candidates: Vec<Candidate>,
    sizing: BatchSizing,
    retry_budget: usize,
) -> Result<TitleOutcome, PaperSiftError> {
    let pass = TitlePass::new(context, sizing);
    let resolved = resolve_with_retry(&pass, candidates, retry_budget, Exhaustion::FailOpen).await?;
    Ok(resolved.output)
}

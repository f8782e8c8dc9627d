//! Abstract pass: per-paper relevance and novelty scores from the model.

use std::collections::{HashMap, HashSet};

use papersift_core::{
    batched, parse_record_stream, resolve_with_retry, Accepted, BatchSizing, Candidate,
    CostAccumulator, Cutoffs, Exhaustion, PaperSiftError, PassOutput, PassResult, Rejection,
    ResolvingPass, ScoredRecord,
};

use crate::{ModelScore, StageContext};

#[derive(Clone, Debug, Default)]
pub struct AbstractOutcome {
    pub accepted: Vec<Accepted>,
    pub rejected: Vec<Rejection>,
    /// Candidates the model never returned a usable record for.
    pub unresolved: Vec<Candidate>,
    /// Every batch's parsed records in call order, including retries.
    pub scored_batches: Vec<Vec<ScoredRecord>>,
    pub cost: CostAccumulator,
}

impl PassOutput for AbstractOutcome {
    type Item = Candidate;

    fn merge(&mut self, other: Self) {
        self.accepted.extend(other.accepted);
        self.rejected.extend(other.rejected);
        self.unresolved.extend(other.unresolved);
        self.scored_batches.extend(other.scored_batches);
        self.cost.merge(&other.cost);
    }

    fn keep_unresolved(&mut self, items: Vec<Candidate>) {
        self.accepted.extend(items.into_iter().map(Accepted::Unscored));
    }
}

pub struct AbstractPass<'a> {
    context: StageContext<'a>,
    sizing: BatchSizing,
    cutoffs: Cutoffs,
    known: HashMap<String, Candidate>,
}

impl<'a> AbstractPass<'a> {
    /// `candidates` is the stage's full input; model records naming any
    /// other id are discarded.
    pub fn new(
        context: StageContext<'a>,
        sizing: BatchSizing,
        cutoffs: Cutoffs,
        candidates: &[Candidate],
    ) -> Self {
        let known = candidates
            .iter()
            .map(|candidate| (candidate.id().to_string(), candidate.clone()))
            .collect();
        Self {
            context,
            sizing,
            cutoffs,
            known,
        }
    }
}

#[async_trait::async_trait]
impl ResolvingPass<Candidate> for AbstractPass<'_> {
    type Output = AbstractOutcome;

    async fn run_pass(
        &self,
        items: Vec<Candidate>,
    ) -> Result<PassResult<Candidate, AbstractOutcome>, PaperSiftError> {
        let size = self.sizing.size_for(items.len());
        tracing::info!(papers = items.len(), batch_size = size, "abstract filtering");

        let mut outcome = AbstractOutcome::default();
        let mut resolved: HashSet<String> = HashSet::new();

        for batch in batched(&items, size) {
            let mut pending: HashSet<&str> = batch.iter().map(Candidate::id).collect();
            let prompt = self.context.prompts.abstract_prompt(&batch);
            let completion = self.context.call(&prompt, &mut outcome.cost).await?;

            let stream = parse_record_stream::<ModelScore>(&completion.text);
            if stream.failures > 0 {
                tracing::warn!(
                    failures = stream.failures,
                    parsed = stream.records.len(),
                    "skipped unparsable lines in abstract filter output"
                );
            }

            let mut scored = Vec::with_capacity(stream.records.len());
            for record in stream.records {
                let Some(candidate) = self.known.get(&record.id) else {
                    tracing::warn!(id = %record.id, "model returned an unknown paper id, dropping record");
                    continue;
                };
                if !batch.iter().any(|c| c.id() == record.id) {
                    tracing::warn!(id = %record.id, "model scored a paper outside its batch, dropping record");
                    continue;
                }
                if !pending.remove(record.id.as_str()) {
                    tracing::debug!(id = %record.id, "ignoring duplicate record within a batch");
                    continue;
                }
                resolved.insert(record.id.clone());

                let scored_record =
                    ScoredRecord::new(candidate.clone(), record.scores(), record.comment);
                scored.push(scored_record.clone());

                if scored_record.scores.passes(&self.cutoffs) {
                    outcome.accepted.push(Accepted::Scored(scored_record));
                } else {
                    tracing::info!(
                        id = scored_record.id(),
                        relevance = scored_record.scores.relevance,
                        novelty = scored_record.scores.novelty,
                        "filtered out by score"
                    );
                    outcome.rejected.push(Rejection::score_filtered(scored_record));
                }
            }
            outcome.scored_batches.push(scored);
        }

        let unresolved: Vec<Candidate> = items
            .into_iter()
            .filter(|candidate| !resolved.contains(candidate.id()))
            .collect();

        tracing::info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            unresolved = unresolved.len(),
            cost = outcome.cost.total_cost(),
            "abstract pass finished"
        );

        Ok(PassResult {
            output: outcome,
            unresolved,
        })
    }
}

/// Runs the abstract pass with retries. Candidates still unscored once the
/// budget is spent land in [`AbstractOutcome::unresolved`].
pub async fn filter_by_abstract(
    context: StageContext<'_>,
    candidates: Vec<Candidate>,
    sizing: BatchSizing,
    cutoffs: Cutoffs,
    retry_budget: usize,
) -> Result<AbstractOutcome, PaperSiftError> {
    let pass = AbstractPass::new(context, sizing, cutoffs, &candidates);
    let resolved =
        resolve_with_retry(&pass, candidates, retry_budget, Exhaustion::FailClosed).await?;

    let mut outcome = resolved.output;
    outcome.unresolved.extend(resolved.unresolved);
    Ok(outcome)
}

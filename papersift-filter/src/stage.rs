use papersift_core::{CostAccumulator, PaperSiftError, PricingTable};
use papersift_llm::{Completion, LlmGateway};
use papersift_prompt::PromptSet;

/// What both filter stages need to issue and account for a model call.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub gateway: &'a LlmGateway,
    pub prompts: &'a PromptSet,
    pub pricing: &'a PricingTable,
    pub model: &'a str,
}

impl<'a> StageContext<'a> {
    /// Sends `prompt` and adds the call's usage and price to `cost`.
    pub async fn call(
        &self,
        prompt: &str,
        cost: &mut CostAccumulator,
    ) -> Result<Completion, PaperSiftError> {
        let completion = self.gateway.call(prompt, self.model).await?;
        let call_cost = self.pricing.cost(self.model, &completion.usage);
        cost.record(&completion.usage, call_cost);

        tracing::info!(
            model = self.model,
            prompt_tokens = completion.usage.prompt_tokens,
            cached_tokens = completion.usage.cached_tokens,
            completion_tokens = completion.usage.completion_tokens,
            prompt_cost = call_cost.prompt_cost,
            completion_cost = call_cost.completion_cost,
            "llm call"
        );

        Ok(completion)
    }
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use papersift_core::{CompletionLlm, LlmRequest, LlmResponse, PaperSiftError};
use papersift_filter::{CandidateSource, Pipeline, ReportSink};
use papersift_llm::{LlmGateway, OpenAiCompatibleClient, RateLimiter};
use papersift_prompt::PromptSet;

use crate::config::API_KEY_ENV;
use crate::{AppConfig, JsonCandidateSource, JsonReportSink, RunArgs};

/// Stands in for the provider when both LLM stages are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLlm;

#[async_trait::async_trait]
impl CompletionLlm for NoLlm {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse, PaperSiftError> {
        Err(PaperSiftError::InvalidConfig(
            "LLM filtering is disabled".to_string(),
        ))
    }
}

fn build_llm(config: &AppConfig) -> anyhow::Result<Arc<dyn CompletionLlm>> {
    let Some(api_key) = config.llm.api_key.clone() else {
        bail!("{API_KEY_ENV} is not set; it is required while an LLM filter is enabled");
    };
    let client = OpenAiCompatibleClient::builder()
        .base_url(&config.llm.base_url)?
        .secret_api_key(api_key)
        .default_model(config.selection.model.clone())
        .timeout(Duration::from_secs(config.llm.timeout_secs))
        .build()?;
    tracing::info!(endpoint = %client.endpoint(), model = %config.selection.model, "using OpenAI-compatible provider");
    Ok(Arc::new(client))
}

/// Loads everything `args` points at, runs the pipeline and publishes the
/// report. `env` resolves environment variables.
pub async fn run(args: RunArgs, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?.with_env(env);
    if let Some(output) = &args.output {
        config.output.output_path = output.clone();
    }
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let filter_config = config.filter_config();
    filter_config.validate()?;

    let prompts = PromptSet::load(&args.prompts)
        .with_context(|| format!("failed to load prompts from {}", args.prompts.display()))?;

    let source = JsonCandidateSource::new(&args.candidates);
    let candidates = source
        .candidates()
        .await
        .with_context(|| format!("failed to load candidates from {}", args.candidates.display()))?;
    if candidates.is_empty() {
        tracing::info!("no papers found, nothing to filter");
        return Ok(());
    }

    let llm: Arc<dyn CompletionLlm> = if filter_config.uses_llm() {
        build_llm(&config)?
    } else {
        Arc::new(NoLlm)
    };
    let gateway = LlmGateway::new(llm, RateLimiter::new(filter_config.limit_per_minute))
        .with_retry_policy(
            config.llm.max_attempts,
            Duration::from_secs(config.llm.retry_delay_secs),
        );

    let pipeline = Pipeline::new(gateway, prompts, filter_config).with_pricing(config.pricing_table());
    let report = pipeline.run(candidates).await.context("filter pipeline failed")?;

    let sink = JsonReportSink::new(&config.output.output_path, date)
        .dump_json(config.output.dump_json)
        .dump_debug(config.output.dump_debug_file)
        .with_config_snapshot(serde_json::to_value(&config)?);
    sink.publish(&report)
        .await
        .context("failed to write report")?;

    tracing::info!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        unresolved = report.unresolved.len(),
        total_cost = report.cost.total_cost(),
        "done"
    );
    Ok(())
}

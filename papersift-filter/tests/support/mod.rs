#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use papersift_core::{
    Candidate, CompletionLlm, LlmRequest, LlmResponse, PaperSiftError, PricingTable, TokenUsage,
};
use papersift_llm::{LlmGateway, RateLimiter};
use papersift_prompt::PromptSet;

pub const PROMPT_TOKENS: u64 = 1_000;
pub const COMPLETION_TOKENS: u64 = 100;

/// Replies with canned text in order, then with `fallback` if set.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new<'a>(replies: impl IntoIterator<Item = &'a str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            fallback: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn repeating(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CompletionLlm for ScriptedLlm {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PaperSiftError> {
        let prompt = request
            .messages
            .first()
            .map(|message| message.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or_else(|| PaperSiftError::InvalidConfig("script exhausted".to_string()))?;

        Ok(LlmResponse {
            content: reply,
            usage: TokenUsage {
                prompt_tokens: PROMPT_TOKENS,
                completion_tokens: COMPLETION_TOKENS,
                cached_tokens: 0,
            },
        })
    }
}

pub fn gateway(llm: Arc<ScriptedLlm>) -> LlmGateway {
    LlmGateway::new(llm, RateLimiter::unlimited())
}

pub fn prompts() -> PromptSet {
    PromptSet::new("SYSTEM", "TOPICS", "CRITERIA", "RESPOND WITH JSON LINES")
}

pub fn pricing() -> PricingTable {
    PricingTable::default()
}

pub fn candidate(id: &str) -> Candidate {
    Candidate::new(
        id,
        format!("Title of {id}"),
        format!("Abstract of {id}"),
        vec!["A. Author".to_string()],
    )
}

pub fn candidates(ids: &[&str]) -> Vec<Candidate> {
    ids.iter().map(|id| candidate(id)).collect()
}

pub fn score_line(id: &str, relevance: i64, novelty: i64) -> String {
    format!(
        r#"{{"ARXIVID": "{id}", "COMMENT": "comment on {id}", "RELEVANCE": {relevance}, "NOVELTY": {novelty}}}"#
    )
}

pub fn ids<'a>(items: impl IntoIterator<Item = &'a Candidate>) -> Vec<String> {
    items.into_iter().map(|c| c.id().to_string()).collect()
}

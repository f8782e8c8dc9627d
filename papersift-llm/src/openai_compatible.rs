//! Generic OpenAI-compatible completion client
//!
//! Works with any provider exposing OpenAI's `chat/completions` endpoint
//! (OpenAI, DeepSeek, GitHub Models, local gateways, ...).

use std::fmt;
use std::time::Duration;

use papersift_core::{
    CompletionLlm, LlmRequest, LlmResponse, Message, PaperSiftError, TokenUsage,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Request body for chat completions endpoint
#[derive(Serialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub seed: i64,
    pub stream: bool,
}

/// Non-streaming response from chat completions
#[derive(Deserialize, Debug, Clone)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    #[serde(default)]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: Option<u64>,
}

impl From<Usage> for TokenUsage {
    fn from(usage: Usage) -> Self {
        TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            cached_tokens: usage
                .prompt_tokens_details
                .and_then(|details| details.cached_tokens)
                .unwrap_or(0),
        }
    }
}

/// OpenAI-style error response
#[derive(Deserialize, Debug, Clone)]
pub struct OpenAiError {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub message: String,
}

#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    http: Client,
    endpoint: Url,
    api_key: SecretString,
    default_model: String,
    timeout: Duration,
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiCompatibleClient {
    pub fn builder() -> OpenAiCompatibleBuilder {
        OpenAiCompatibleBuilder::default()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> PaperSiftError {
        if err.is_timeout() {
            PaperSiftError::Timeout(self.timeout)
        } else {
            PaperSiftError::LlmProvider(err.to_string())
        }
    }
}

#[derive(Default)]
pub struct OpenAiCompatibleBuilder {
    base_url: Option<Url>,
    api_key: Option<SecretString>,
    default_model: Option<String>,
    timeout: Option<Duration>,
}

impl fmt::Debug for OpenAiCompatibleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_some() {
            "<redacted>"
        } else {
            "<none>"
        };

        f.debug_struct("OpenAiCompatibleBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &api_key)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiCompatibleBuilder {
    pub fn base_url(mut self, value: impl AsRef<str>) -> Result<Self, PaperSiftError> {
        let url = Url::parse(value.as_ref())
            .map_err(|err| PaperSiftError::InvalidConfig(format!("invalid base url: {err}")))?;
        self.base_url = Some(url);
        Ok(self)
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(value.into()));
        self
    }

    pub fn secret_api_key(mut self, value: SecretString) -> Self {
        self.api_key = Some(value);
        self
    }

    pub fn default_model(mut self, value: impl Into<String>) -> Self {
        self.default_model = Some(value.into());
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn build(self) -> Result<OpenAiCompatibleClient, PaperSiftError> {
        let api_key = self
            .api_key
            .ok_or_else(|| PaperSiftError::InvalidConfig("missing api key".to_string()))?;
        if api_key.expose_secret().trim().is_empty() {
            return Err(PaperSiftError::InvalidConfig("empty api key".to_string()));
        }

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(OPENAI_BASE_URL)
                .map_err(|err| PaperSiftError::InvalidConfig(err.to_string()))?,
        };
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            base_url.as_str().trim_end_matches('/')
        ))
        .map_err(|err| PaperSiftError::InvalidConfig(err.to_string()))?;

        let timeout = self.timeout.unwrap_or(Duration::from_secs(120));
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PaperSiftError::LlmProvider(err.to_string()))?;

        Ok(OpenAiCompatibleClient {
            http,
            endpoint,
            api_key,
            default_model: self.default_model.unwrap_or_default(),
            timeout,
        })
    }
}

#[async_trait::async_trait]
impl CompletionLlm for OpenAiCompatibleClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PaperSiftError> {
        let LlmRequest {
            model,
            messages,
            temperature,
            seed,
        } = request;
        let model = if model.is_empty() {
            self.default_model.clone()
        } else {
            model
        };
        if model.is_empty() {
            return Err(PaperSiftError::InvalidConfig(
                "no model set on request or client".to_string(),
            ));
        }

        let body = ChatCompletionRequest {
            model,
            messages,
            temperature,
            seed,
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, text));
            return Err(PaperSiftError::LlmProvider(message));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|err| PaperSiftError::LlmProvider(err.to_string()))?;

        let usage = match completion.usage {
            Some(usage) => TokenUsage::from(usage),
            None => {
                tracing::warn!(model = %body.model, "completion response carried no usage");
                TokenUsage::default()
            }
        };

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PaperSiftError::LlmProvider("no choices returned".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
        })
    }
}

//! Together-style hosted inference provider
//!
//! Implements [`CompletionProvider`] for endpoints that take a raw prompt at
//! `POST {api_base}/inference` and answer with `choices[0].text`.
//!
//! # Example
//!
//! ```no_run
//! use market_llm::{CompletionProvider, CompletionRequest};
//! use market_llm::providers::{TogetherConfig, TogetherProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = TogetherProvider::with_config(TogetherConfig::new("api-key"))?;
//!
//! let request = CompletionRequest::builder("mistralai/Mixtral-8x7B-Instruct-v0.1")
//!     .prompt("[INST] Say hi [/INST]")
//!     .max_tokens(16)
//!     .build();
//!
//! let response = provider.complete(request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionProvider, CompletionRequest, CompletionResponse, FinishReason, LLMError, Result,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_TOGETHER_API_BASE: &str = "https://api.together.xyz";

/// Configuration for the Together provider
#[derive(Clone)]
pub struct TogetherConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// Base URL; requests go to `{api_base}/inference`
    pub api_base: String,

    /// Request timeout in seconds. `None` leaves the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl TogetherConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_TOGETHER_API_BASE.to_string(),
            timeout_secs: None,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the API key from `TOGETHER_API_KEY` and, if set, the base URL
    /// from `TOGETHER_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TOGETHER_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError(
                    "TOGETHER_API_KEY environment variable not set".to_string(),
                )
            })?;

        let api_base = std::env::var("TOGETHER_API_BASE")
            .unwrap_or_else(|_| DEFAULT_TOGETHER_API_BASE.to_string());

        Ok(Self::new(api_key).with_api_base(api_base))
    }

    /// Set a custom API base URL (trailing slashes are dropped)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Full URL of the inference endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/inference", self.api_base)
    }
}

impl std::fmt::Debug for TogetherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TogetherConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Provider for Together-style `/inference` endpoints
pub struct TogetherProvider {
    client: Client,
    config: TogetherConfig,
}

impl TogetherProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: TogetherConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(TogetherConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(TogetherConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &TogetherConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionProvider for TogetherProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending completion request ({} prompt bytes)", request.prompt.len());

        let body = TogetherRequest {
            model: &request.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop.as_deref(),
        };

        let response = self
            .client
            .post(self.config.endpoint())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => LLMError::AuthenticationFailed,
                429 => LLMError::RateLimitExceeded(error_text),
                400 => LLMError::InvalidRequest(error_text),
                404 => LLMError::ModelNotFound(request.model),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let together_response: TogetherResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = together_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        let usage = together_response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        debug!(
            "Received completion - finish_reason: {:?}, tokens: {:?}",
            choice.finish_reason, usage
        );

        Ok(CompletionResponse {
            text: choice.text,
            finish_reason: choice.finish_reason.as_deref().map(map_finish_reason),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        "together"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct TogetherRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct TogetherResponse {
    choices: Vec<TogetherChoice>,
    #[serde(default)]
    usage: Option<TogetherUsage>,
}

#[derive(Debug, Deserialize)]
struct TogetherChoice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TogetherUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "length" => FinishReason::MaxTokens,
        "stop_sequence" => FinishReason::StopSequence,
        "stop" | "eos" => FinishReason::EndTurn,
        other => {
            debug!("Unknown finish reason: {}", other);
            FinishReason::EndTurn
        }
    }
}

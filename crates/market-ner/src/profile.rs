//! Extraction profile: model settings, allow-list and few-shot examples
//!
//! The default profile targets NSE-listed NIFTY 50 companies through a
//! Mixtral instruct model. A JSON profile can override any subset of fields;
//! missing fields keep their defaults.

use crate::entities::ExtractionResult;
use crate::error::{NerError, Result};
use crate::universe::TickerUniverse;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
const DEFAULT_MAX_TOKENS: usize = 100;
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_STOP: [&str; 4] = ["[/INST]", "[INST]", "\n```", "\nInput:"];

/// One worked example embedded in the prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FewShotExample {
    /// User text
    pub input: String,
    /// Expected extraction
    pub output: ExtractionResult,
}

impl FewShotExample {
    pub fn new(input: impl Into<String>, output: ExtractionResult) -> Self {
        Self {
            input: input.into(),
            output,
        }
    }
}

/// Everything the extractor needs besides the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionProfile {
    /// Model identifier sent to the completion endpoint
    pub model: String,

    /// Generation budget, sized for one short JSON object
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Stop sequences
    pub stop: Vec<String>,

    /// Allowed tickers
    pub universe: TickerUniverse,

    /// Few-shot examples, rendered in order
    pub examples: Vec<FewShotExample>,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            stop: DEFAULT_STOP.iter().map(ToString::to_string).collect(),
            universe: TickerUniverse::nifty50(),
            examples: default_examples(),
        }
    }
}

fn default_examples() -> Vec<FewShotExample> {
    vec![
        FewShotExample::new(
            "What do you think about reliance industries for next month?",
            ExtractionResult {
                company_name: Some("Reliance Industries".to_string()),
                ticker: Some("RELIANCE.NS".to_string()),
                date_range: Some("next month".to_string()),
            },
        ),
        FewShotExample::new(
            "How will Tata's steel business do over the next 15 days?",
            ExtractionResult {
                company_name: Some("Tata Steel".to_string()),
                ticker: Some("TATASTEEL.NS".to_string()),
                date_range: Some("next 15 days".to_string()),
            },
        ),
        FewShotExample::new("what is the general market trend", ExtractionResult::empty()),
    ]
}

impl ExtractionProfile {
    /// Parse and validate a profile from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Replace the ticker universe
    ///
    /// Examples whose tickers fall outside the new universe will fail
    /// [`validate`](Self::validate).
    pub fn with_universe(mut self, universe: TickerUniverse) -> Self {
        self.universe = universe;
        self
    }

    /// Replace the few-shot examples
    pub fn with_examples(mut self, examples: Vec<FewShotExample>) -> Self {
        self.examples = examples;
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Validate the profile
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(NerError::Config("model must not be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(NerError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(NerError::Config(format!(
                "temperature {} is outside 0.0..=2.0",
                self.temperature
            )));
        }

        for example in &self.examples {
            if let Some(ticker) = &example.output.ticker {
                if !self.universe.contains(ticker) {
                    return Err(NerError::Config(format!(
                        "example ticker {ticker} is not in universe {}",
                        self.universe.version()
                    )));
                }
            }
        }

        Ok(())
    }
}

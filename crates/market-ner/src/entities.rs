//! Extraction result types

use serde::{Deserialize, Serialize};

/// Entities extracted from one prompt
///
/// Always serializes with exactly the three keys, `null` included. Missing
/// keys deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Company name as the model resolved it
    #[serde(default)]
    pub company_name: Option<String>,

    /// Suffix-qualified ticker from the allow-list
    #[serde(default)]
    pub ticker: Option<String>,

    /// Natural-language time span ("next week", "15 days")
    #[serde(default)]
    pub date_range: Option<String>,
}

impl ExtractionResult {
    /// The all-null record
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no entity was found
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none() && self.ticker.is_none() && self.date_range.is_none()
    }
}

/// How an extraction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The model answered and at least one entity survived validation
    Extracted,
    /// The model answered but nothing was found
    NothingFound,
    /// The completion endpoint call failed
    UpstreamFailed,
    /// The completion held no parseable JSON object
    MalformedCompletion,
    /// The prompt could not be rendered
    PromptFailed,
}

impl ExtractionOutcome {
    /// Whether the all-null result came from a failure rather than the model
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            Self::UpstreamFailed | Self::MalformedCompletion | Self::PromptFailed
        )
    }
}

/// Extraction result plus its outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub outcome: ExtractionOutcome,
}

impl Extraction {
    /// Wrap a parsed result, classifying it as found or empty
    pub fn from_result(result: ExtractionResult) -> Self {
        let outcome = if result.is_empty() {
            ExtractionOutcome::NothingFound
        } else {
            ExtractionOutcome::Extracted
        };
        Self { result, outcome }
    }

    /// The all-null record for a failed extraction
    pub fn fallback(outcome: ExtractionOutcome) -> Self {
        Self {
            result: ExtractionResult::empty(),
            outcome,
        }
    }
}

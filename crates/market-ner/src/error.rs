//! Error types for entity extraction
//!
//! These never reach callers of [`crate::EntityExtractor::extract`]; they
//! classify why the fallback record was produced and report bad
//! configuration artifacts.

use crate::entities::ExtractionOutcome;
use thiserror::Error;

/// Result type alias for extraction internals
pub type Result<T> = std::result::Result<T, NerError>;

/// Entity extraction errors
#[derive(Debug, Error)]
pub enum NerError {
    /// Completion endpoint call failed
    #[error("Completion request failed: {0}")]
    Upstream(#[from] market_llm::LLMError),

    /// Completion text has no `{ ... }` pair
    #[error("No JSON object found in completion")]
    NoJsonObject,

    /// Sliced completion text is not valid JSON
    #[error("Invalid JSON in completion: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Prompt template failed to render
    #[error("Failed to render prompt: {0}")]
    Prompt(String),

    /// Ticker universe or profile is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Profile file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NerError {
    /// The extraction outcome this error falls back with
    pub fn outcome(&self) -> ExtractionOutcome {
        match self {
            Self::Upstream(_) => ExtractionOutcome::UpstreamFailed,
            Self::NoJsonObject | Self::InvalidJson(_) => ExtractionOutcome::MalformedCompletion,
            Self::Prompt(_) | Self::Config(_) | Self::Io(_) => ExtractionOutcome::PromptFailed,
        }
    }
}

impl From<minijinja::Error> for NerError {
    fn from(err: minijinja::Error) -> Self {
        NerError::Prompt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NerError::NoJsonObject.to_string(),
            "No JSON object found in completion"
        );
        assert_eq!(
            NerError::Config("empty suffix".to_string()).to_string(),
            "Invalid configuration: empty suffix"
        );

        let err: NerError = market_llm::LLMError::AuthenticationFailed.into();
        assert!(err.to_string().starts_with("Completion request failed"));
    }

    #[test]
    fn test_outcome_for_error() {
        let upstream: NerError =
            market_llm::LLMError::RequestFailed("HTTP 502: bad gateway".to_string()).into();
        assert_eq!(upstream.outcome(), ExtractionOutcome::UpstreamFailed);
        assert!(upstream.outcome().is_failure());

        let invalid: NerError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(invalid.outcome(), ExtractionOutcome::MalformedCompletion);
        assert_eq!(
            NerError::NoJsonObject.outcome(),
            ExtractionOutcome::MalformedCompletion
        );
        assert_eq!(
            NerError::Prompt("undefined filter".to_string()).outcome(),
            ExtractionOutcome::PromptFailed
        );
    }
}

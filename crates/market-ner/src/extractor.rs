//! The entity extractor

use crate::entities::{Extraction, ExtractionResult};
use crate::error::Result;
use crate::profile::ExtractionProfile;
use crate::{prompt, sanitize};
use market_llm::{CompletionProvider, CompletionRequest};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Extracts company, ticker and date range from free text
///
/// Stateless between calls; one instance can be shared across tasks.
pub struct EntityExtractor {
    provider: Arc<dyn CompletionProvider>,
    profile: ExtractionProfile,
}

impl EntityExtractor {
    /// Create an extractor with the default NIFTY 50 profile
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::with_profile(provider, ExtractionProfile::default())
    }

    /// Create an extractor with a custom profile
    pub fn with_profile(provider: Arc<dyn CompletionProvider>, profile: ExtractionProfile) -> Self {
        Self { provider, profile }
    }

    /// Get the active profile
    pub fn profile(&self) -> &ExtractionProfile {
        &self.profile
    }

    /// Build the completion request for `text`
    pub fn build_request(&self, text: &str) -> Result<CompletionRequest> {
        let prompt = prompt::render(&self.profile, text)?;

        Ok(CompletionRequest::builder(&self.profile.model)
            .prompt(prompt)
            .max_tokens(self.profile.max_tokens)
            .temperature(self.profile.temperature)
            .stop(self.profile.stop.iter().cloned())
            .build())
    }

    /// Extract entities, degrading every failure to the all-null record
    pub async fn extract(&self, text: &str) -> ExtractionResult {
        self.extract_detailed(text).await.result
    }

    /// Extract entities and report how the extraction ended
    #[instrument(skip(self, text), fields(provider = self.provider.name(), input_len = text.len()))]
    pub async fn extract_detailed(&self, text: &str) -> Extraction {
        match self.try_extract(text).await {
            Ok(result) => {
                debug!(?result, "Extracted entities");
                Extraction::from_result(result)
            }
            Err(e) => {
                warn!("Entity extraction failed: {}", e);
                Extraction::fallback(e.outcome())
            }
        }
    }

    async fn try_extract(&self, text: &str) -> Result<ExtractionResult> {
        let request = self.build_request(text)?;
        let response = self.provider.complete(request).await?;

        let raw_output = response.text.trim();
        sanitize::parse_completion(raw_output, &self.profile.universe).inspect_err(|_| {
            warn!(raw_output, "Could not parse model output");
        })
    }
}

impl std::fmt::Debug for EntityExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityExtractor")
            .field("provider", &self.provider.name())
            .field("profile", &self.profile)
            .finish()
    }
}

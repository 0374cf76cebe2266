//! Completion provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for hosted text-completion providers
///
/// One call is one outbound request. Implementations do not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a continuation of `request.prompt`
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "together")
    fn name(&self) -> &str;
}

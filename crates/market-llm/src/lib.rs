//! Hosted text-completion layer for market-query
//!
//! This crate provides a provider-agnostic abstraction over hosted
//! text-completion endpoints (prompt in, continuation out). It includes:
//!
//! - Completion request/response types
//! - The [`CompletionProvider`] trait
//! - A concrete provider for Together-style `/inference` endpoints

pub mod completion;
pub mod error;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use provider::CompletionProvider;

//! Financial entity extraction from free text
//!
//! [`EntityExtractor`] turns a user prompt such as
//! *"What do you think about reliance industries for next month?"* into an
//! [`ExtractionResult`] with a company name, an allow-listed ticker and a
//! date range, using a hosted completion model behind
//! [`market_llm::CompletionProvider`].
//!
//! The model is treated as an untrusted text source:
//!
//! - the prompt constrains it (rules, the full ticker allow-list, few-shot
//!   examples, stop sequences),
//! - the completion is sliced to its outermost `{ ... }` and parsed,
//! - tickers outside the [`TickerUniverse`] are nulled,
//! - any failure yields the all-null record instead of an error.
//!
//! # Example
//!
//! ```no_run
//! use market_llm::providers::TogetherProvider;
//! use market_ner::EntityExtractor;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(TogetherProvider::new("api-key")?);
//! let extractor = EntityExtractor::new(provider);
//!
//! let entities = extractor
//!     .extract("What do you think about reliance industries for next month?")
//!     .await;
//! println!("{:?}", entities.ticker);
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod error;
pub mod extractor;
pub mod profile;
pub mod prompt;
pub mod sanitize;
pub mod universe;

pub use entities::{Extraction, ExtractionOutcome, ExtractionResult};
pub use error::{NerError, Result};
pub use extractor::EntityExtractor;
pub use profile::{ExtractionProfile, FewShotExample};
pub use universe::TickerUniverse;

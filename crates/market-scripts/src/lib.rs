//! External script delegation
//!
//! Data collection and price prediction live in Python scripts. This crate
//! runs them as child processes with a timeout and turns their exit status
//! and output into typed results:
//!
//! - [`ScriptRunner`]: spawn one script, capture stdout/stderr, kill on timeout
//! - [`MarketScripts`]: the two operations the server needs
//! - [`PythonScripts`]: [`MarketScripts`] over a [`ScriptRunner`]

pub mod config;
pub mod error;
pub mod prediction;
pub mod runner;
pub mod scripts;

pub use config::ScriptConfig;
pub use error::{Result, ScriptError};
pub use prediction::{DataWindow, Prediction, PredictionReport, PricePoint};
pub use runner::{ScriptOutput, ScriptRunner};
pub use scripts::{MarketScripts, PythonScripts};

//! Shared utilities for market-query
//!
//! This crate provides common functionality used across the market-query workspace,
//! including logging setup, `.env` loading, and application metadata.

pub mod config;
pub mod env;
pub mod logging;

pub use config::{AppInfo, Environment};
pub use env::{env_var, load_dotenv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};

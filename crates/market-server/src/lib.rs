//! HTTP API for prompt-driven stock prediction
//!
//! Routes, all under `/api/v1`:
//!
//! - `GET /health`
//! - `POST /query/prompt`: extract a ticker from `{"Query": "..."}` and run
//!   the prediction script for it
//! - `POST /data/collect`: run the daily data collector
//!
//! Successful responses use the [`ApiResponse`] envelope, failures the
//! [`ApiError`] envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use api::{ApiError, ApiResponse};
pub use config::ServerArgs;
pub use error::{Result, ServerError};
pub use routes::{BODY_LIMIT_BYTES, router};
pub use state::AppState;

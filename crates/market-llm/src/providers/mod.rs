//! Concrete completion provider implementations

pub mod together;

pub use together::{TogetherConfig, TogetherProvider};

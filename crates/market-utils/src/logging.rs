//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, one event per line
    #[default]
    Pretty,
    /// Newline-delimited JSON, for log shippers
    Json,
}

impl LogFormat {
    /// Parse a format name (`json` selects JSON, anything else is pretty)
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }

    /// Read the format from `LOG_FORMAT`
    pub fn from_env() -> Self {
        crate::env_var("LOG_FORMAT").map_or_else(Self::default, |v| Self::parse(&v))
    }
}

/// Initialize tracing at `info`, in the format named by `LOG_FORMAT`
pub fn init_tracing() {
    init_tracing_with("info", LogFormat::from_env());
}

/// Initialize tracing with a fallback filter directive and output format
///
/// `RUST_LOG` takes precedence over `default_directive` when set.
pub fn init_tracing_with(default_directive: &str, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

//! Command-line and environment configuration

use crate::error::{Result, ServerError};
use clap::Parser;
use market_ner::ExtractionProfile;
use market_scripts::ScriptConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Prompt-driven stock prediction API
#[derive(Parser, Debug, Clone)]
#[command(name = "market-server")]
#[command(about = "HTTP API for prompt-driven stock price prediction", long_about = None)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Directory holding the collector and prediction scripts
    #[arg(long, env = "SCRIPTS_DIR", default_value = "ml_scripts")]
    pub scripts_dir: PathBuf,

    /// Python interpreter used to run the scripts
    #[arg(long = "python", env = "PYTHON_BIN", default_value = "python3")]
    pub python: String,

    /// Per-script timeout in seconds
    #[arg(long, env = "SCRIPT_TIMEOUT_SECS", default_value_t = 300)]
    pub script_timeout: u64,

    /// JSON extraction profile (model, allow-list, few-shot examples)
    #[arg(long, env = "NER_PROFILE")]
    pub profile: Option<PathBuf>,

    /// Allowed CORS origin; any origin when unset
    #[arg(long, env = "CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl ServerArgs {
    /// Resolve the socket address to bind
    ///
    /// `host` may be an IP literal or a hostname such as `localhost`; the
    /// first resolved address is used.
    pub async fn addr(&self) -> Result<SocketAddr> {
        let invalid = |detail: String| {
            ServerError::Config(format!("invalid listen address {}: {detail}", self.host))
        };

        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("host resolved to no addresses".to_string()))
    }

    /// Script runner configuration
    pub fn script_config(&self) -> ScriptConfig {
        ScriptConfig::default()
            .with_interpreter(self.python.clone())
            .with_scripts_dir(self.scripts_dir.clone())
            .with_timeout(Duration::from_secs(self.script_timeout))
    }

    /// Load the extraction profile, or the built-in one when no path is set
    pub fn extraction_profile(&self) -> Result<ExtractionProfile> {
        match &self.profile {
            Some(path) => ExtractionProfile::from_path(path).map_err(|e| {
                ServerError::Config(format!("failed to load profile {}: {e}", path.display()))
            }),
            None => Ok(ExtractionProfile::default()),
        }
    }
}

//! Script runner configuration

use crate::error::{Result, ScriptError};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_INTERPRETER: &str = "python3";
const DEFAULT_SCRIPTS_DIR: &str = "ml_scripts";
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_COLLECTOR_SCRIPT: &str = "daily_collector.py";
const DEFAULT_PREDICTION_SCRIPT: &str = "prediction_handler.py";

/// Where the scripts live and how to run them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Interpreter executable
    pub interpreter: String,

    /// Directory holding the scripts
    pub scripts_dir: PathBuf,

    /// Wall-clock limit per script run
    pub timeout: Duration,

    /// Data collection script, relative to `scripts_dir`
    pub collector_script: String,

    /// Prediction script, relative to `scripts_dir`
    pub prediction_script: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            scripts_dir: PathBuf::from(DEFAULT_SCRIPTS_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            collector_script: DEFAULT_COLLECTOR_SCRIPT.to_string(),
            prediction_script: DEFAULT_PREDICTION_SCRIPT.to_string(),
        }
    }
}

impl ScriptConfig {
    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Set the scripts directory
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = dir.into();
        self
    }

    /// Set the per-run timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the data collection script name
    pub fn with_collector_script(mut self, script: impl Into<String>) -> Self {
        self.collector_script = script.into();
        self
    }

    /// Set the prediction script name
    pub fn with_prediction_script(mut self, script: impl Into<String>) -> Self {
        self.prediction_script = script.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.interpreter.trim().is_empty() {
            return Err(ScriptError::Config("interpreter must not be empty".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(ScriptError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.collector_script.trim().is_empty() || self.prediction_script.trim().is_empty() {
            return Err(ScriptError::Config("script names must not be empty".to_string()));
        }

        Ok(())
    }
}

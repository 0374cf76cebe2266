//! Data collection and prediction operations

use crate::config::ScriptConfig;
use crate::error::{Result, ScriptError};
use crate::prediction::{Prediction, PredictionReport};
use crate::runner::ScriptRunner;
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// The script-backed operations the server relies on
#[async_trait]
pub trait MarketScripts: Send + Sync {
    /// Run the daily collector and return its stdout log
    async fn collect_data(&self) -> Result<String>;

    /// Predict the next closing price for a qualified ticker
    async fn predict(&self, ticker: &str) -> Result<Prediction>;
}

/// [`MarketScripts`] backed by Python scripts on disk
#[derive(Debug, Clone)]
pub struct PythonScripts {
    runner: ScriptRunner,
}

impl PythonScripts {
    pub fn new(config: ScriptConfig) -> Result<Self> {
        Ok(Self {
            runner: ScriptRunner::new(config)?,
        })
    }

    pub fn with_runner(runner: ScriptRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &ScriptRunner {
        &self.runner
    }
}

#[async_trait]
impl MarketScripts for PythonScripts {
    #[instrument(skip(self))]
    async fn collect_data(&self) -> Result<String> {
        let script = &self.runner.config().collector_script;
        let output = self.runner.run(script, &[]).await?;
        info!("Data collection finished");
        Ok(output.stdout)
    }

    #[instrument(skip(self))]
    async fn predict(&self, ticker: &str) -> Result<Prediction> {
        let script = &self.runner.config().prediction_script;
        let output = self.runner.run(script, &[ticker]).await?;

        let report = PredictionReport::parse(&output.stdout).map_err(|e| {
            warn!(stdout = %output.stdout.trim(), "Unparseable prediction output: {}", e);
            ScriptError::InvalidOutput {
                script: script.clone(),
                detail: e.to_string(),
                stdout: output.stdout.clone(),
            }
        })?;

        match report {
            PredictionReport::Success(prediction) => {
                info!(
                    "Predicted {} for {} on {}",
                    prediction.predicted_price, prediction.ticker, prediction.prediction_date
                );
                Ok(prediction)
            }
            PredictionReport::Error { message } => {
                warn!("Prediction script reported an error: {}", message);
                Err(ScriptError::Reported(message))
            }
        }
    }
}

//! Prediction script output

use serde::{Deserialize, Serialize};

/// A dated closing price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    pub price: f64,
}

/// First and last rows of the lookback window the model saw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataWindow {
    pub start_point: PricePoint,
    pub end_point: PricePoint,
}

/// Next-day price prediction for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub prediction_date: String,
    pub predicted_price: f64,
    pub data_used: DataWindow,
}

/// JSON document printed by the prediction script, tagged by `status`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictionReport {
    Success(Prediction),
    Error { message: String },
}

impl PredictionReport {
    /// Parse script stdout
    ///
    /// Libraries imported by the script may print to stdout around the
    /// report, so on failure the text from the first `{` to the last `}`
    /// is parsed instead.
    pub fn parse(stdout: &str) -> serde_json::Result<Self> {
        let trimmed = stdout.trim();
        match serde_json::from_str(trimmed) {
            Ok(report) => Ok(report),
            Err(err) => match (trimmed.find('{'), trimmed.rfind('}')) {
                (Some(start), Some(end)) if start < end => {
                    serde_json::from_str(&trimmed[start..=end])
                }
                _ => Err(err),
            },
        }
    }
}

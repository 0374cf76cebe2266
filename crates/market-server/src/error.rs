//! Server error types

use crate::api::ApiError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use market_scripts::ScriptError;
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors surfaced by the HTTP layer
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("The 'Query' field is required in the request body.")]
    MissingQuery,

    #[error("Request body exceeds the {limit} byte limit.")]
    PayloadTooLarge { limit: usize },

    #[error("Could not extract a valid stock ticker and date range from the prompt.")]
    EntitiesNotFound,

    /// A script run failed; `message` is what the client sees
    #[error("{message}")]
    Script {
        message: String,
        #[source]
        source: ScriptError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Wrap a failure of the prediction script
    pub fn prediction(err: ScriptError) -> Self {
        let message = match &err {
            ScriptError::Failed { .. } => "Prediction script failed.".to_string(),
            ScriptError::InvalidOutput { .. } => {
                "Failed to parse prediction script output.".to_string()
            }
            ScriptError::Reported(_) => "The prediction script returned an error.".to_string(),
            ScriptError::Spawn { source, .. } => {
                format!("Failed to start Python script: {source}")
            }
            ScriptError::TimedOut { timeout, .. } => format!(
                "Prediction script timed out after {} seconds.",
                timeout.as_secs()
            ),
            other => other.to_string(),
        };
        Self::Script {
            message,
            source: err,
        }
    }

    /// Wrap a failure of the data collection script
    pub fn collection(err: ScriptError) -> Self {
        let message = match &err {
            ScriptError::Failed { code, .. } => match code {
                Some(code) => format!("Data collection script failed with exit code {code}."),
                None => "Data collection script was terminated by a signal.".to_string(),
            },
            ScriptError::Spawn { source, .. } => {
                format!("Failed to start Python script: {source}")
            }
            ScriptError::TimedOut { timeout, .. } => format!(
                "Data collection script timed out after {} seconds.",
                timeout.as_secs()
            ),
            other => other.to_string(),
        };
        Self::Script {
            message,
            source: err,
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingQuery | Self::EntitiesNotFound => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Script { .. } | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn errors(&self) -> Vec<String> {
        match self {
            Self::Script { source, .. } => source
                .detail()
                .map(str::trim)
                .filter(|detail| !detail.is_empty())
                .map(|detail| vec![detail.to_string()])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl From<&ServerError> for ApiError {
    fn from(err: &ServerError) -> Self {
        ApiError::new(err.status(), err.to_string(), err.errors())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            match &self {
                Self::Script { source, .. } => error!("{}: {}", self, source),
                _ => error!("{}", self),
            }
        }
        ApiError::from(&self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_errors() {
        assert_eq!(ServerError::MissingQuery.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ServerError::EntitiesNotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::PayloadTooLarge { limit: 16 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );

        let api = ApiError::from(&ServerError::MissingQuery);
        assert_eq!(api.message, "The 'Query' field is required in the request body.");
        assert!(api.errors.is_empty());
    }

    #[test]
    fn test_prediction_failure_carries_stderr() {
        let err = ServerError::prediction(ScriptError::Failed {
            script: "prediction_handler.py".to_string(),
            code: Some(1),
            stderr: "KeyError: 'Close'\n".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let api = ApiError::from(&err);
        assert_eq!(api.message, "Prediction script failed.");
        assert_eq!(api.errors, vec!["KeyError: 'Close'".to_string()]);
    }

    #[test]
    fn test_prediction_reported_error() {
        let err = ServerError::prediction(ScriptError::Reported("No model".to_string()));
        let api = ApiError::from(&err);
        assert_eq!(api.message, "The prediction script returned an error.");
        assert_eq!(api.errors, vec!["No model".to_string()]);
    }

    #[test]
    fn test_collection_messages() {
        let err = ServerError::collection(ScriptError::Failed {
            script: "daily_collector.py".to_string(),
            code: Some(2),
            stderr: String::new(),
        });
        let api = ApiError::from(&err);
        assert_eq!(api.message, "Data collection script failed with exit code 2.");
        assert!(api.errors.is_empty());

        let err = ServerError::collection(ScriptError::TimedOut {
            script: "daily_collector.py".to_string(),
            timeout: Duration::from_secs(300),
        });
        assert_eq!(
            err.to_string(),
            "Data collection script timed out after 300 seconds."
        );
    }
}

//! Error types for script execution

use std::time::Duration;
use thiserror::Error;

/// Result type alias for script operations
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Script execution errors
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The interpreter could not be started
    #[error("Failed to start script {script}: {source}")]
    Spawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed
    #[error("IO error while running script: {0}")]
    Io(#[from] std::io::Error),

    /// The script outlived its timeout and was killed
    #[error("Script {script} timed out after {} seconds", .timeout.as_secs())]
    TimedOut { script: String, timeout: Duration },

    /// The script exited unsuccessfully
    #[error("Script {script} failed with exit code {}", display_code(.code.as_ref()))]
    Failed {
        script: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The script's stdout could not be interpreted
    #[error("Failed to parse output of {script}: {detail}")]
    InvalidOutput {
        script: String,
        detail: String,
        stdout: String,
    },

    /// The script ran and reported an error in its own output
    #[error("Script reported an error: {0}")]
    Reported(String),

    /// Invalid runner configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScriptError {
    /// Diagnostic detail worth relaying to a client (stderr, raw stdout, message)
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => Some(stderr.as_str()),
            Self::InvalidOutput { stdout, .. } => Some(stdout.as_str()),
            Self::Reported(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

fn display_code(code: Option<&i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScriptError::Failed {
            script: "daily_collector.py".to_string(),
            code: Some(2),
            stderr: "Traceback".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Script daily_collector.py failed with exit code 2"
        );
        assert_eq!(err.detail(), Some("Traceback"));

        let err = ScriptError::TimedOut {
            script: "daily_collector.py".to_string(),
            timeout: Duration::from_secs(300),
        };
        assert_eq!(
            err.to_string(),
            "Script daily_collector.py timed out after 300 seconds"
        );
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_signal_exit_display() {
        let err = ScriptError::Failed {
            script: "s".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}

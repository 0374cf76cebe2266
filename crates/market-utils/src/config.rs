//! Application metadata

use serde::{Deserialize, Serialize};

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name; unknown names map to development
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

/// Application name and environment, logged at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// Application name
    pub app_name: String,
    /// Environment (development, production)
    pub environment: Environment,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            app_name: "market-query".to_string(),
            environment: Environment::Development,
        }
    }
}

impl AppInfo {
    /// Create app info with the given name in the development environment
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Read the environment from `APP_ENV`
    pub fn with_env_environment(mut self) -> Self {
        if let Some(value) = crate::env_var("APP_ENV") {
            self.environment = Environment::parse(&value);
        }
        self
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

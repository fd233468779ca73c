//! Configuration for the lending workflow

use crate::evaluation::{default_panel, validate_panel, LenderProfile};
use serde::{Deserialize, Serialize};

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Lender panel, in quote order
    #[serde(default = "default_panel")]
    pub panel: Vec<LenderProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "smart-lending".to_string(),
            panel: default_panel(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    ///
    /// `LENDING_PANEL_FILE` names a config file to start from;
    /// `LENDING_SERVICE_NAME` overrides the service name.
    pub fn from_env() -> crate::Result<Self> {
        let mut config = match std::env::var("LENDING_PANEL_FILE") {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };

        if let Ok(name) = std::env::var("LENDING_SERVICE_NAME") {
            config.service_name = name;
        }

        Ok(config)
    }

    /// Check the panel is usable
    pub fn validate(&self) -> crate::Result<()> {
        validate_panel(&self.panel)
    }
}

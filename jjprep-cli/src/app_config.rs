//! Global configuration at ~/.config/jjprep/config.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

fn default_redirect_port() -> u16 {
    8849
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Root URL of the backend API, e.g. "https://api.example.com".
    pub api_root: String,

    /// Port the authorization callback listener binds on localhost.
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
}

impl AppConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("jjprep");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            anyhow::bail!(
                "Config not found.\n\n\
                Create {} with:\n\n\
                api_root = \"https://your-backend.example.com\"\n",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Ok(config)
    }
}

//! Stored bearer token for the backend API.
//!
//! The token is issued elsewhere (the product's account settings page)
//! and pasted into `jjprep auth`. Stored at ~/.config/jjprep/session.toml.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Yields the bearer token to attach to API requests, if any.
///
/// Requests carry the session cookie either way, so a missing token is
/// not an error.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

#[derive(Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
}

fn session_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("jjprep")
        .join("session.toml"))
}

impl Session {
    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize session")?;

        let path = session_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since the file contains a bearer token:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    pub fn clear() -> Result<()> {
        let path = session_path()?;

        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }

        Ok(())
    }
}

/// Token source backed by the session file.
///
/// Reads the file on every request so an `auth` run in another terminal
/// takes effect immediately.
pub struct StoredToken;

impl TokenSource for StoredToken {
    fn bearer_token(&self) -> Option<String> {
        let path = session_path().ok()?;
        let contents = std::fs::read_to_string(path).ok()?;
        let session: Session = toml::from_str(&contents).ok()?;

        Some(session.access_token)
    }
}

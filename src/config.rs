//! Credential lookup and the persisted settings file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const SETTINGS_DIR: &str = "ghi";
const SETTINGS_FILE: &str = "settings.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub token: Option<String>,
}

/// `<config_dir>/ghi/settings.yaml`
pub fn settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to locate the user configuration directory")?;
    Ok(config_dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

impl Settings {
    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create settings directory")?;
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml).context("Failed to write settings file")?;

        Ok(())
    }
}

/// Token precedence: explicit flag, then environment, then settings file
pub fn resolve_token(flag: Option<&str>, env: Option<String>, settings: &Settings) -> Option<String> {
    flag.map(str::to_string)
        .or(env)
        .or_else(|| settings.token.clone())
        .filter(|t| !t.trim().is_empty())
}

/// Resolve the token for this invocation from the real environment and settings file
pub fn load_token(flag: Option<&str>) -> Result<String> {
    let settings = Settings::load_from_path(&settings_path()?)?;

    resolve_token(flag, std::env::var(TOKEN_ENV_VAR).ok(), &settings)
        .context("You need to specify a GitHub token. Use --token, set GITHUB_TOKEN or run `ghi auth <TOKEN>`")
}

//! Application configuration.
//!
//! Values are layered: built-in defaults, then the user's
//! `~/.config/gamezone/config.toml`, then `GAMEZONE_*` environment
//! variables.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory under the user config root holding `config.toml`.
pub const CONFIG_DIR: &str = "gamezone";
/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/games";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_PREFIX: &str = "GAMEZONE";

const DEFAULT_CONFIG_TOML: &str = r#"# GameZone configuration

# Catalog endpoint serving GET / POST / DELETE for games.
endpoint = "http://127.0.0.1:8080/games"

# Use the built-in sample catalog instead of the endpoint.
offline = false

# Seconds before an HTTP request is abandoned.
request_timeout_secs = 30
"#;

/// Runtime configuration for the catalog client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the remote catalog collaborator.
    pub endpoint: String,
    /// Serve the in-memory sample catalog instead of calling `endpoint`.
    pub offline: bool,
    /// Per-request timeout applied to the HTTP client.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            offline: false,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path`, which may be absent.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(path.as_ref(), ENV_PREFIX)
    }

    fn load_layered(path: &Path, env_prefix: &str) -> Result<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("endpoint", defaults.endpoint)?
            .set_default("offline", defaults.offline)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Path of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    ensure_config_at(config_path())
}

fn ensure_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn written_default_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/config.toml");
        ensure_config_at(&path)?;
        assert!(path.exists());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "endpoint = \"https://games.example.com/api\"\noffline = true\nrequest_timeout_secs = 5\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.endpoint, "https://games.example.com/api");
        assert!(config.offline);
        assert_eq!(config.request_timeout_secs, 5);
        Ok(())
    }

    #[test]
    fn environment_overrides_file_and_defaults() -> Result<()> {
        // A private prefix keeps parallel tests from seeing these variables.
        let prefix = "GZ_CONFIG_LAYER_TEST";
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = \"https://file.example.com\"\nrequest_timeout_secs = 5\n")?;

        std::env::set_var(format!("{prefix}_ENDPOINT"), "http://x/y");
        std::env::set_var(format!("{prefix}_OFFLINE"), "true");
        std::env::set_var(format!("{prefix}_REQUEST_TIMEOUT_SECS"), "7");
        let loaded = AppConfig::load_layered(&path, prefix);
        for key in ["ENDPOINT", "OFFLINE", "REQUEST_TIMEOUT_SECS"] {
            std::env::remove_var(format!("{prefix}_{key}"));
        }

        assert_eq!(
            loaded?,
            AppConfig {
                endpoint: "http://x/y".to_string(),
                offline: true,
                request_timeout_secs: 7,
            }
        );
        Ok(())
    }

    #[test]
    fn existing_file_is_left_alone() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "offline = true\n")?;
        ensure_config_at(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "offline = true\n");
        Ok(())
    }
}

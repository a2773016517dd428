// CLI Settings
// Precedence: defaults < config file < JOBTRACK_* environment < command line

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use jobtrack_infra_http::{HttpStoreConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::path::PathBuf;

const ENV_PREFIX: &str = "JOBTRACK";
const CONFIG_FILE: &str = "config.toml";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Settings {
    /// Load settings
    ///
    /// # Arguments
    ///
    /// * `config_path` - Explicit config file (`~` expanded); must exist
    /// * `api_url` - Command-line override for the store URL
    pub fn load(config_path: Option<&str>, api_url: Option<String>) -> Result<Self> {
        let (path, required) = match config_path {
            Some(raw) => (PathBuf::from(shellexpand::tilde(raw).into_owned()), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Self::build(None, false, api_url),
            },
        };

        Self::build(Some(path), required, api_url)
    }

    fn build(path: Option<PathBuf>, required: bool, api_url: Option<String>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api_url", DEFAULT_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("log_format", "pretty")?;

        if let Some(path) = &path {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("api_url", api_url)?
            .build()
            .with_context(|| match &path {
                Some(path) => format!("Failed to read settings from {}", path.display()),
                None => "Failed to read settings".to_string(),
            })?;

        let settings: Self = settings
            .try_deserialize()
            .context("Invalid settings")?;

        anyhow::ensure!(
            settings.timeout_secs > 0,
            "Invalid settings: timeout_secs must be at least 1"
        );
        Ok(settings)
    }

    pub fn store_config(&self) -> HttpStoreConfig {
        HttpStoreConfig {
            base_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// `<platform config dir>/jobtrack/config.toml`
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jobtrack").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

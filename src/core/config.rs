use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

/// Fixed parameters of a pipeline run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EtlConfig {
    /// Page holding the ranked table of banks
    pub source_url: String,
    /// Exchange rate CSV (`Currency,Rate`)
    pub rates_path: PathBuf,
    pub csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    /// Audit trail of stage transitions
    pub log_path: PathBuf,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            rates_path: PathBuf::from("exchange_rate.csv"),
            csv_path: PathBuf::from("Largest_banks_data.csv"),
            database_path: PathBuf::from("Banks.db"),
            table_name: "Largest_banks".to_string(),
            log_path: PathBuf::from("code_log.txt"),
        }
    }
}

impl EtlConfig {
    /// Loads the config at `path` if given, else the per-user config file if
    /// one exists, else the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            debug!("Loading default config from {}", default_path.display());
            Self::load_from_path(&default_path)
        } else {
            debug!("No config file found, using built-in defaults");
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "bankcap", "bankcap")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

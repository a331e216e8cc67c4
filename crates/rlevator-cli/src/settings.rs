//! Layered CLI settings
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file, then
//! `RLEVATOR__*` environment variables (`__` separates nested keys, e.g.
//! `RLEVATOR__SIMULATION__EPISODE_LEN=500`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use rlevator_core::SimConfig;

pub const CONFIG_FILE_NAME: &str = "rlevator.toml";
pub const CONFIG_ENV: &str = "RLEVATOR_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimConfig,
    pub benchmark: BenchmarkSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Episodes per policy
    pub episodes: usize,
    /// Policy names, see `commands::benchmark::POLICIES`
    pub policies: Vec<String>,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            episodes: 10,
            policies: vec![
                "scan".to_string(),
                "scan_no_memory".to_string(),
                "random".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::find_config_file(explicit)?;
        Self::load_from(path.as_deref())
    }

    /// Load from an exact file, skipping the search
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigBuilder::<config::builder::DefaultState>::default();

        if let Some(path) = path {
            tracing::debug!("Loading config from: {:?}", path);
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        } else {
            tracing::debug!("No config file found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix("RLEVATOR")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.simulation.validate()?;
        Ok(settings)
    }

    /// Find the configuration file
    ///
    /// Checks, in order: the `--config` flag, `RLEVATOR_CONFIG`,
    /// `./rlevator.toml`, `~/.config/rlevator/rlevator.toml`. An explicit
    /// path that does not exist is an error; the others are optional.
    pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
            return Ok(Some(path.to_path_buf()));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(Self::user_config_path().filter(|path| path.exists()))
    }

    /// `~/.config/rlevator/rlevator.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("rlevator").join(CONFIG_FILE_NAME))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

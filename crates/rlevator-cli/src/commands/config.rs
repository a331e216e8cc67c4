//! Configuration management commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::settings::{Settings, CONFIG_FILE_NAME};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Destination (defaults to ./rlevator.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run(cmd: ConfigCommands, explicit: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(explicit),
        ConfigCommands::Init { path, force } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            if init(&path, force)? {
                println!("Configuration written to {}", path.display());
            } else {
                println!("Configuration file already exists: {}", path.display());
                println!("Use --force to overwrite");
            }
            Ok(())
        }
    }
}

fn show(explicit: Option<&Path>) -> Result<()> {
    let path = Settings::find_config_file(explicit)?;
    let settings = Settings::load_from(path.as_deref())?;

    match &path {
        Some(path) => println!("# Config file: {}", path.display()),
        None => println!("# No configuration file found. Using defaults."),
    }
    println!("{}", settings.to_toml()?);
    Ok(())
}

/// Write the default settings to `path`; returns false if it already exists
fn init(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, Settings::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

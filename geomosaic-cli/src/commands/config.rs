//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and modifying settings from the command line.

use std::path::PathBuf;

use clap::Subcommand;
use geomosaic::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;
use crate::runner::{load_config, GlobalOptions};

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., tiles.zoom)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., tiles.zoom)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(global: &GlobalOptions, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(global, &key),
        ConfigCommands::Set { key, value } => run_set(global, &key, &value),
        ConfigCommands::List => run_list(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'geomosaic config list' to see available keys.",
            key
        ))
    })
}

fn target_path(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match &global.config {
        Some(path) => Ok(path.clone()),
        None => Ok(config_file_path()?),
    }
}

/// Get a configuration value.
fn run_get(global: &GlobalOptions, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = load_config(global)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value.
fn run_set(global: &GlobalOptions, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let path = target_path(global)?;

    // A missing file is created from defaults
    let mut config = ConfigFile::load_from(&path)?;
    config_key.set(&mut config, value)?;
    config.save_to(&path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));

    Ok(())
}

/// List all configuration settings.
fn run_list(global: &GlobalOptions) -> Result<(), CliError> {
    let config = load_config(global)?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        // Print section header when section changes
        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}

/// Show the configuration file path.
fn run_path(global: &GlobalOptions) -> Result<(), CliError> {
    let path = target_path(global)?;
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist, defaults are in use)");
    }
    Ok(())
}

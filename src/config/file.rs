// Licensed under the Open Software License version 3.0
use super::{
    env::{load_env_file, lookup, DotenvEnvironment, Environment, ProcessEnvironment},
    error::ConfigError,
    types::{Config, Example},
};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer};
use std::{
    fs::{self},
    path::{Path, PathBuf},
    process,
};

const CONFIG_FILE_VARIABLE: &str = "UPS_MONITOR_CONFIG_FILE";

fn write_example_config_to_file(path: &Path) -> bool {
    // Use 4 spaces for indentation
    let formatter = PrettyFormatter::with_indent(b"    ");
    // Serialize example config to pretty json
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    if Config::example().serialize(&mut serializer).is_err() {
        return false;
    }
    // Write config to file and return result
    fs::write(path, buffer).is_ok()
}

///  Checks if config file exists and creates it if not
/// # Returns
/// `true` if config was written to file
/// `false` if config file already exists
fn create_example_config_if_not_exists(path: &Path) -> bool {
    if !path.exists() {
        // Create example config
        return write_example_config_to_file(path);
    }
    false
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    // Try to read config file and pass error if failed
    let config_file = fs::read_to_string(path)?;
    // Try to parse config file and pass error if failed
    let config: Config = serde_json::from_str(&config_file)?;
    Ok(config)
}

/// Build the config from an optional file and environment overrides
fn load_config(env: &dyn Environment) -> Result<Config, ConfigError> {
    // Empty UPS_MONITOR_CONFIG_FILE counts as unset
    let mut config = match lookup(env, CONFIG_FILE_VARIABLE).map(PathBuf::from) {
        Some(path) => {
            tracing::debug!("Reading config from: {}", path.display());
            read_config(&path).map_err(|error| {
                // Leave an example behind for the user to edit
                if create_example_config_if_not_exists(&path) {
                    tracing::error!(
                        "Wrote example config to {}. Please edit this file and try again.",
                        path.display()
                    );
                }
                error
            })?
        }
        None => {
            tracing::trace!("{} not set, using environment only", CONFIG_FILE_VARIABLE);
            Config::default()
        }
    };
    // Environment wins over file values
    config.apply_env(env)?;
    // Refuse to start with missing or malformed settings
    config.validate()?;
    Ok(config)
}

pub fn load_config_or_exit() -> Config {
    // Process environment wins over values from .env
    let env = DotenvEnvironment::new(&ProcessEnvironment, load_env_file());
    // Exit on failure
    match load_config(&env) {
        Ok(config) => {
            tracing::debug!("Successfully loaded config");
            config
        }
        Err(error) => {
            tracing::error!("Invalid configuration: {}", error);
            tracing::error!("Set the variables in the environment or in a .env file");
            process::exit(1);
        }
    }
}

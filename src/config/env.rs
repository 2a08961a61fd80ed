// Licensed under the Open Software License version 3.0
use super::error::ConfigError;
use std::{collections::HashMap, str::FromStr};

/// Source of environment variables, replaceable in tests
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads from the process environment
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<const N: usize> Environment for [(&str, &str); N] {
    fn get(&self, name: &str) -> Option<String> {
        self.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| String::from(*value))
    }
}

/// Process environment layered over values read from a `.env` file
pub struct DotenvEnvironment<'a> {
    process: &'a dyn Environment,
    file_values: HashMap<String, String>,
}

impl<'a> DotenvEnvironment<'a> {
    pub fn new(process: &'a dyn Environment, file_values: HashMap<String, String>) -> Self {
        Self {
            process,
            file_values,
        }
    }
}

impl Environment for DotenvEnvironment<'_> {
    fn get(&self, name: &str) -> Option<String> {
        // Real variables win over the file
        self.process
            .get(name)
            .or_else(|| self.file_values.get(name).cloned())
    }
}

/// Read `.env` from the working directory or one of its parents
///
/// A missing file is normal, any other problem is logged and the file is skipped
pub fn load_env_file() -> HashMap<String, String> {
    match dotenvy::dotenv_iter() {
        Ok(entries) => collect_env_file(entries),
        Err(error) if error.not_found() => {
            tracing::trace!("No .env file found");
            HashMap::new()
        }
        Err(error) => {
            tracing::warn!("Failed to load .env file: {}", error);
            HashMap::new()
        }
    }
}

pub fn collect_env_file(
    entries: impl Iterator<Item = dotenvy::Result<(String, String)>>,
) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for entry in entries {
        match entry {
            Ok((key, value)) => {
                tracing::trace!("Read {} from .env", key);
                values.insert(key, value);
            }
            // Skip the bad line, keep the rest
            Err(error) => tracing::warn!("Ignoring invalid .env entry: {}", error),
        }
    }
    values
}

/// Look up a variable, treating empty values as unset
pub fn lookup(env: &dyn Environment, name: &str) -> Option<String> {
    env.get(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a hexadecimal identifier such as `0665` or `0x0665`
pub fn parse_hex_u16(name: &'static str, value: &str) -> Result<u16, ConfigError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::InvalidHex {
        name,
        value: String::from(value),
    })
}

pub fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: String::from(value),
    })
}

pub fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: String::from(value),
        }),
    }
}

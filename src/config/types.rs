// Licensed under the Open Software License version 3.0
use super::{env::Environment, error::ConfigError};
use crate::hid::config::DeviceConfig;
use crate::monitor::config::MonitorConfig;
use crate::notify::config::BarkConfig;
use serde::{Deserialize, Serialize};

// Values to generate example config file
pub trait Example {
    fn example() -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
/// `Config` struct for deserializing the optional config file
/// Every field can be overridden with environment variables
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub bark: BarkConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Example for Config {
    fn example() -> Self {
        Self {
            device: DeviceConfig::example(),
            bark: BarkConfig::example(),
            monitor: MonitorConfig::example(),
        }
    }
}

impl Config {
    pub fn apply_env(&mut self, env: &dyn Environment) -> Result<(), ConfigError> {
        self.device.apply_env(env)?;
        self.bark.apply_env(env)?;
        self.monitor.apply_env(env)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.device.validate()?;
        self.bark.validate()?;
        Ok(())
    }
}

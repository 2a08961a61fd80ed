// Licensed under the Open Software License version 3.0
use crate::config::{
    env::{lookup, parse_number, Environment},
    error::ConfigError,
    types::Example,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_VOLUME: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BarkConfig {
    url: Option<String>,
    volume: Option<u8>,
    timeout: Option<Duration>,
}

impl Example for BarkConfig {
    fn example() -> Self {
        Self {
            url: Some(String::from("https://api.day.app/EXAMPLE_DEVICE_KEY")),
            volume: Some(5),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl BarkConfig {
    #[cfg(test)]
    pub fn new(url: String) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    pub fn apply_env(&mut self, env: &dyn Environment) -> Result<(), ConfigError> {
        if let Some(value) = lookup(env, "BARK_URL") {
            self.url = Some(value);
        }
        if let Some(value) = lookup(env, "BARK_VOLUME") {
            self.volume = Some(parse_number("BARK_VOLUME", &value)?);
        }
        Ok(())
    }

    pub fn get_url(&self) -> Result<Url, ConfigError> {
        let url = self.url.as_deref().ok_or(ConfigError::Missing("BARK_URL"))?;
        let parsed = Url::parse(url).map_err(|error| ConfigError::InvalidUrl {
            name: "BARK_URL",
            reason: error.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                name: "BARK_URL",
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(parsed)
    }

    pub fn get_volume(&self) -> Result<u8, ConfigError> {
        let volume = self.volume.unwrap_or(5);
        if volume > MAX_VOLUME {
            return Err(ConfigError::OutOfRange {
                name: "BARK_VOLUME",
                min: 0,
                max: MAX_VOLUME as u64,
                value: volume as u64,
            });
        }
        Ok(volume)
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout.unwrap_or(Duration::from_secs(5))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.get_url()?;
        self.get_volume()?;
        Ok(())
    }
}

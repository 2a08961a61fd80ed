// Licensed under the Open Software License version 3.0
use thiserror::Error;

/// Fatal startup errors, the monitor never starts with a partial config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("{name} must be a hexadecimal number, got {value:?}")]
    InvalidHex { name: &'static str, value: String },

    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },

    #[error("{name} is not a valid http(s) url: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

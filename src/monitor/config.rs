// Licensed under the Open Software License version 3.0
use crate::config::{
    env::{lookup, parse_bool, parse_number, Environment},
    error::ConfigError,
    types::Example,
};
use crate::ups::tracker::AlertPolicy;
use serde::{Deserialize, Serialize};
use std::{cmp::max, time::Duration};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MonitorConfig {
    poll_interval: Option<Duration>,
    notify_on_read_recovery: Option<bool>,
}

impl Example for MonitorConfig {
    fn example() -> Self {
        Self {
            poll_interval: Some(Duration::from_secs(2)),
            notify_on_read_recovery: Some(false),
        }
    }
}

impl MonitorConfig {
    pub fn apply_env(&mut self, env: &dyn Environment) -> Result<(), ConfigError> {
        if let Some(value) = lookup(env, "POLL_INTERVAL") {
            let seconds: f64 = parse_number("POLL_INTERVAL", &value)?;
            let interval = Duration::try_from_secs_f64(seconds).map_err(|_| {
                ConfigError::InvalidNumber {
                    name: "POLL_INTERVAL",
                    value,
                }
            })?;
            self.poll_interval = Some(interval);
        }
        if let Some(value) = lookup(env, "NOTIFY_ON_READ_RECOVERY") {
            self.notify_on_read_recovery = Some(parse_bool("NOTIFY_ON_READ_RECOVERY", &value)?);
        }
        Ok(())
    }

    pub fn get_poll_interval(&self) -> Duration {
        max(
            self.poll_interval.unwrap_or(Duration::from_secs(2)),
            MIN_POLL_INTERVAL,
        )
    }

    pub fn get_alert_policy(&self) -> AlertPolicy {
        AlertPolicy {
            notify_on_read_recovery: self.notify_on_read_recovery.unwrap_or_default(),
        }
    }
}

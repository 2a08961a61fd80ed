// Licensed under the Open Software License version 3.0
use crate::config::{
    env::{lookup, parse_hex_u16, Environment},
    error::ConfigError,
    types::Example,
};
use crate::ups::status::{STATUS_REPORT_ID, STATUS_REPORT_LENGTH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeviceConfig {
    vendor_id: Option<u16>,
    product_id: Option<u16>,
    report_id: Option<u8>,
    report_length: Option<usize>,
}

impl Example for DeviceConfig {
    fn example() -> Self {
        Self {
            vendor_id: Some(0x0665),
            product_id: Some(0x5161),
            report_id: Some(STATUS_REPORT_ID),
            report_length: Some(STATUS_REPORT_LENGTH),
        }
    }
}

impl DeviceConfig {
    pub fn apply_env(&mut self, env: &dyn Environment) -> Result<(), ConfigError> {
        if let Some(value) = lookup(env, "VENDOR_ID") {
            self.vendor_id = Some(parse_hex_u16("VENDOR_ID", &value)?);
        }
        if let Some(value) = lookup(env, "PRODUCT_ID") {
            self.product_id = Some(parse_hex_u16("PRODUCT_ID", &value)?);
        }
        Ok(())
    }

    pub fn get_vendor_id(&self) -> Result<u16, ConfigError> {
        self.vendor_id.ok_or(ConfigError::Missing("VENDOR_ID"))
    }

    pub fn get_product_id(&self) -> Result<u16, ConfigError> {
        self.product_id.ok_or(ConfigError::Missing("PRODUCT_ID"))
    }

    pub fn get_report_id(&self) -> u8 {
        self.report_id.unwrap_or(STATUS_REPORT_ID)
    }

    pub fn get_report_length(&self) -> usize {
        self.report_length.unwrap_or(STATUS_REPORT_LENGTH)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.get_vendor_id()?;
        self.get_product_id()?;
        let report_length = self.get_report_length();
        // Status byte lives at index 1 and the ioctl size field is 14 bits
        if !(STATUS_REPORT_LENGTH..=4096).contains(&report_length) {
            return Err(ConfigError::OutOfRange {
                name: "report_length",
                min: STATUS_REPORT_LENGTH as u64,
                max: 4096,
                value: report_length as u64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_env() {
        let mut config = DeviceConfig::default();
        config
            .apply_env(&[("VENDOR_ID", "0x0463"), ("PRODUCT_ID", "ffff")])
            .unwrap();
        assert_eq!(config.get_vendor_id().unwrap(), 0x0463);
        assert_eq!(config.get_product_id().unwrap(), 0xffff);
        assert_eq!(config.get_report_id(), 1);
        assert_eq!(config.get_report_length(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_ids() {
        let config = DeviceConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("VENDOR_ID"))
        ));
        let mut config = DeviceConfig::default();
        config.apply_env(&[("VENDOR_ID", "0665")]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("PRODUCT_ID"))
        ));
    }

    #[test]
    fn test_malformed_id() {
        let mut config = DeviceConfig::example();
        let result = config.apply_env(&[("PRODUCT_ID", "santak")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHex { name: "PRODUCT_ID", .. })
        ));
    }

    #[test]
    fn test_short_report_is_rejected() {
        let config = DeviceConfig {
            report_length: Some(1),
            ..DeviceConfig::example()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}

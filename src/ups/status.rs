// Licensed under the Open Software License version 3.0
use serde::{Deserialize, Serialize};

/// Length of the status feature report, report id included
pub const STATUS_REPORT_LENGTH: usize = 8;
/// Feature report that carries the status flags
pub const STATUS_REPORT_ID: u8 = 1;

// Byte index 1 of the status report
const STATUS_BYTE: usize = 1;
const AC_PRESENT: u8 = 0x01;
const BATTERY_LOW: u8 = 0x02;
const CHARGING: u8 = 0x08;
const DISCHARGING: u8 = 0x20;
const OVERLOAD: u8 = 0x40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsStatus {
    pub ac_present: bool,
    pub battery_low: bool,
    pub charging: bool,
    pub discharging: bool,
    pub overload: bool,
    pub raw_hex: String,
}

impl UpsStatus {
    /// Decode a status feature report
    ///
    /// Returns `None` if the buffer is empty or shorter than
    /// [`STATUS_REPORT_LENGTH`], which callers treat as a failed read
    pub fn decode(buffer: &[u8]) -> Option<Self> {
        if buffer.is_empty() {
            return None;
        }
        if buffer.len() < STATUS_REPORT_LENGTH {
            tracing::warn!(
                "Status report too short: got {} bytes, expected {}",
                buffer.len(),
                STATUS_REPORT_LENGTH
            );
            return None;
        }
        let flags = buffer[STATUS_BYTE];
        Some(Self {
            ac_present: flags & AC_PRESENT != 0,
            battery_low: flags & BATTERY_LOW != 0,
            charging: flags & CHARGING != 0,
            discharging: flags & DISCHARGING != 0,
            overload: flags & OVERLOAD != 0,
            raw_hex: to_hex(buffer),
        })
    }

    /// Human readable single line summary
    pub fn render(&self) -> String {
        format!(
            "AC: {} | battery: {} | charging: {} | discharging: {} | load: {} | raw: {}",
            if self.ac_present { "present" } else { "lost" },
            if self.battery_low { "low" } else { "normal" },
            if self.charging { "yes" } else { "no" },
            if self.discharging { "yes" } else { "no" },
            if self.overload { "overload" } else { "normal" },
            self.raw_hex
        )
    }
}

fn to_hex(buffer: &[u8]) -> String {
    buffer
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<String>>()
        .join(" ")
}

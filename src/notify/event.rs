// Licensed under the Open Software License version 3.0
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Normal,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    ConnectFailure,
    ReadFailure,
    ReadRestored,
    PowerOutage,
    PowerRestored,
    BatteryLow,
}

impl AlertKind {
    pub fn message(&self) -> &'static str {
        match self {
            AlertKind::ConnectFailure => "cannot connect to UPS device",
            AlertKind::ReadFailure => "cannot read UPS data",
            AlertKind::ReadRestored => "UPS data readable again",
            AlertKind::PowerOutage => "power outage detected",
            AlertKind::PowerRestored => "mains power restored",
            AlertKind::BatteryLow => "battery low",
        }
    }

    pub fn urgency(&self) -> Urgency {
        match self {
            AlertKind::ReadRestored | AlertKind::PowerRestored => Urgency::Normal,
            _ => Urgency::Critical,
        }
    }

    /// Only conditions that need immediate attention keep ringing
    pub fn continuous_ring(&self) -> bool {
        matches!(self, AlertKind::PowerOutage | AlertKind::BatteryLow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    pub message: String,
    pub urgency: Urgency,
    pub continuous_ring: bool,
}

impl From<AlertKind> for AlertEvent {
    fn from(kind: AlertKind) -> Self {
        Self {
            kind,
            message: String::from(kind.message()),
            urgency: kind.urgency(),
            continuous_ring: kind.continuous_ring(),
        }
    }
}

/// Outcome of a single delivery attempt, used for logging only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub ok: bool,
    pub detail: String,
}

impl DeliveryResult {
    pub fn delivered(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_attributes() {
        let outage = AlertEvent::from(AlertKind::PowerOutage);
        assert_eq!(outage.message, "power outage detected");
        assert_eq!(outage.urgency, Urgency::Critical);
        assert!(outage.continuous_ring);

        let restored = AlertEvent::from(AlertKind::PowerRestored);
        assert_eq!(restored.message, "mains power restored");
        assert_eq!(restored.urgency, Urgency::Normal);
        assert!(!restored.continuous_ring);

        let read_failure = AlertEvent::from(AlertKind::ReadFailure);
        assert_eq!(read_failure.message, "cannot read UPS data");
        assert_eq!(read_failure.urgency, Urgency::Critical);
        assert!(!read_failure.continuous_ring);

        let battery_low = AlertEvent::from(AlertKind::BatteryLow);
        assert_eq!(battery_low.message, "battery low");
        assert_eq!(battery_low.urgency, Urgency::Critical);
        assert!(battery_low.continuous_ring);

        let connect_failure = AlertEvent::from(AlertKind::ConnectFailure);
        assert_eq!(connect_failure.urgency, Urgency::Critical);
        assert!(!connect_failure.continuous_ring);
    }
}

// Licensed under the Open Software License version 3.0
use super::status::UpsStatus;
use crate::notify::event::{AlertEvent, AlertKind};

/// Last observed state of a single UPS
///
/// Both latches start as `true` so that startup doesn't produce
/// "power restored" or "read failure" alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    last_power_state: bool,
    last_read_ok: bool,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            last_power_state: true,
            last_read_ok: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertPolicy {
    /// Alert when data can be read again after a failure
    pub notify_on_read_recovery: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TransitionTracker {
    policy: AlertPolicy,
}

impl TransitionTracker {
    pub fn new(policy: AlertPolicy) -> Self {
        Self { policy }
    }

    /// Compare a reading against `state` and return alerts in delivery order
    ///
    /// Read health and power presence are edge-triggered.
    /// Low battery while on battery power fires on every call.
    pub fn decide(
        &self,
        state: &mut TrackerState,
        status: Option<&UpsStatus>,
        read_succeeded: bool,
    ) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        // A failed read carries nothing to evaluate on the power axis
        let status = match (read_succeeded, status) {
            (true, Some(status)) => status,
            _ => {
                if state.last_read_ok {
                    events.push(AlertEvent::from(AlertKind::ReadFailure));
                }
                state.last_read_ok = false;
                return events;
            }
        };

        if !state.last_read_ok && self.policy.notify_on_read_recovery {
            events.push(AlertEvent::from(AlertKind::ReadRestored));
        }

        if status.ac_present != state.last_power_state {
            if status.ac_present {
                events.push(AlertEvent::from(AlertKind::PowerRestored));
            } else {
                events.push(AlertEvent::from(AlertKind::PowerOutage));
            }
        }

        if status.battery_low && !status.ac_present {
            events.push(AlertEvent::from(AlertKind::BatteryLow));
        }

        state.last_read_ok = true;
        state.last_power_state = status.ac_present;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(ac_present: bool, battery_low: bool) -> UpsStatus {
        UpsStatus {
            ac_present,
            battery_low,
            charging: ac_present,
            discharging: !ac_present,
            overload: false,
            raw_hex: String::new(),
        }
    }

    fn kinds(events: &[AlertEvent]) -> Vec<AlertKind> {
        events.iter().map(|event| event.kind).collect()
    }

    #[test]
    fn test_initial_state() {
        let state = TrackerState::default();
        assert!(state.last_power_state);
        assert!(state.last_read_ok);
    }

    #[test]
    fn test_first_read_with_mains_is_silent() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let events = tracker.decide(&mut state, Some(&status(true, false)), true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_power_loss_edge() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        tracker.decide(&mut state, Some(&status(true, false)), true);

        let events = tracker.decide(&mut state, Some(&status(false, false)), true);
        assert_eq!(kinds(&events), vec![AlertKind::PowerOutage]);
        assert_eq!(events[0].message, "power outage detected");
        assert!(events[0].continuous_ring);
        assert!(!state.last_power_state);

        let events = tracker.decide(&mut state, Some(&status(false, false)), true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_power_restore_edge() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        tracker.decide(&mut state, Some(&status(false, false)), true);

        let events = tracker.decide(&mut state, Some(&status(true, false)), true);
        assert_eq!(kinds(&events), vec![AlertKind::PowerRestored]);
        assert!(!events[0].continuous_ring);

        let events = tracker.decide(&mut state, Some(&status(true, false)), true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_read_failure_is_debounced() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        tracker.decide(&mut state, Some(&status(true, false)), true);

        let events = tracker.decide(&mut state, None, false);
        assert_eq!(kinds(&events), vec![AlertKind::ReadFailure]);
        assert!(!state.last_read_ok);

        for _ in 0..3 {
            assert!(tracker.decide(&mut state, None, false).is_empty());
        }

        // Recovery is silent by default
        let events = tracker.decide(&mut state, Some(&status(true, false)), true);
        assert!(events.is_empty());
        assert!(state.last_read_ok);

        // And the next failure alerts again
        let events = tracker.decide(&mut state, None, false);
        assert_eq!(kinds(&events), vec![AlertKind::ReadFailure]);
    }

    #[test]
    fn test_missing_status_counts_as_failure() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let events = tracker.decide(&mut state, None, true);
        assert_eq!(kinds(&events), vec![AlertKind::ReadFailure]);
    }

    #[test]
    fn test_failure_skips_power_axis() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let on_battery = status(false, true);
        let events = tracker.decide(&mut state, Some(&on_battery), false);
        assert_eq!(kinds(&events), vec![AlertKind::ReadFailure]);
        assert!(state.last_power_state);
    }

    #[test]
    fn test_battery_low_is_level_triggered() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        tracker.decide(&mut state, Some(&status(false, false)), true);

        for _ in 0..3 {
            let events = tracker.decide(&mut state, Some(&status(false, true)), true);
            assert_eq!(kinds(&events), vec![AlertKind::BatteryLow]);
        }
    }

    #[test]
    fn test_battery_low_on_mains_is_silent() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let events = tracker.decide(&mut state, Some(&status(true, true)), true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_power_loss_before_battery_low() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let events = tracker.decide(&mut state, Some(&status(false, true)), true);
        assert_eq!(
            kinds(&events),
            vec![AlertKind::PowerOutage, AlertKind::BatteryLow]
        );
    }

    #[test]
    fn test_read_recovery_policy() {
        let tracker = TransitionTracker::new(AlertPolicy {
            notify_on_read_recovery: true,
        });
        let mut state = TrackerState::default();
        tracker.decide(&mut state, None, false);

        let events = tracker.decide(&mut state, Some(&status(false, false)), true);
        assert_eq!(
            kinds(&events),
            vec![AlertKind::ReadRestored, AlertKind::PowerOutage]
        );

        let events = tracker.decide(&mut state, Some(&status(false, false)), true);
        assert!(events.is_empty());
    }

    #[test]
    fn test_scenario() {
        let tracker = TransitionTracker::default();
        let mut state = TrackerState::default();
        let readings = [
            Some(status(true, false)),
            Some(status(false, false)),
            Some(status(false, true)),
            None,
            None,
            Some(status(true, false)),
        ];
        let fired: Vec<Vec<AlertKind>> = readings
            .iter()
            .map(|reading| {
                let events = tracker.decide(&mut state, reading.as_ref(), reading.is_some());
                kinds(&events)
            })
            .collect();
        assert_eq!(
            fired,
            vec![
                vec![],
                vec![AlertKind::PowerOutage],
                vec![AlertKind::BatteryLow],
                vec![AlertKind::ReadFailure],
                vec![],
                vec![AlertKind::PowerRestored],
            ]
        );
    }
}

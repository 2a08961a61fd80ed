// Licensed under the Open Software License version 3.0
#[mockall_double::double]
use crate::hid::device::HidrawDevice;
use super::config::MonitorConfig;
use crate::{
    hid::config::DeviceConfig,
    notify::{
        bark::BarkNotifier,
        event::{AlertEvent, AlertKind},
    },
    ups::{
        status::UpsStatus,
        tracker::{TrackerState, TransitionTracker},
    },
};
use std::time::Duration;
use tokio::{sync::broadcast, time::sleep};

/// Open the configured UPS, sending a critical alert if that fails
///
/// Returns `None` when the device can't be opened, the caller must not
/// start polling in that case
pub async fn connect_or_alert(
    config: &DeviceConfig,
    notifier: &BarkNotifier,
) -> Option<HidrawDevice> {
    let (vendor_id, product_id) = match (config.get_vendor_id(), config.get_product_id()) {
        (Ok(vendor_id), Ok(product_id)) => (vendor_id, product_id),
        (Err(error), _) | (_, Err(error)) => {
            tracing::error!("Cannot connect to UPS: {}", error);
            return None;
        }
    };
    tracing::info!("Connecting to UPS {:04x}:{:04x}", vendor_id, product_id);
    match HidrawDevice::open(vendor_id, product_id) {
        Ok(device) => Some(device),
        Err(error) => {
            tracing::error!("Failed to connect to UPS: {}", error);
            notifier
                .send(&AlertEvent::from(AlertKind::ConnectFailure))
                .await;
            None
        }
    }
}

pub struct Monitor {
    // Dropping the monitor releases the device
    device: HidrawDevice,
    notifier: BarkNotifier,
    tracker: TransitionTracker,
    state: TrackerState,
    report_id: u8,
    report_length: usize,
    poll_interval: Duration,
}

impl Monitor {
    pub fn new(
        device: HidrawDevice,
        notifier: BarkNotifier,
        device_config: &DeviceConfig,
        monitor_config: &MonitorConfig,
    ) -> Self {
        Self {
            device,
            notifier,
            tracker: TransitionTracker::new(monitor_config.get_alert_policy()),
            state: TrackerState::default(),
            report_id: device_config.get_report_id(),
            report_length: device_config.get_report_length(),
            poll_interval: monitor_config.get_poll_interval(),
        }
    }

    fn read_status(&mut self) -> (Option<UpsStatus>, bool) {
        match self
            .device
            .get_feature_report(self.report_id, self.report_length)
        {
            Ok(report) => (UpsStatus::decode(&report), true),
            Err(error) => {
                tracing::warn!("Failed to read UPS status: {}", error);
                (None, false)
            }
        }
    }

    /// Poll the device once and deliver resulting alerts in order
    pub async fn tick(&mut self) -> Vec<AlertEvent> {
        let (status, read_succeeded) = self.read_status();
        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        match &status {
            Some(status) => tracing::info!("[{}] {}", timestamp, status.render()),
            None => tracing::warn!("[{}] UPS status unavailable", timestamp),
        }
        let events = self
            .tracker
            .decide(&mut self.state, status.as_ref(), read_succeeded);
        for event in &events {
            tracing::debug!("Dispatching {:?}", event.kind);
            self.notifier.send(event).await;
        }
        events
    }

    pub async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        tracing::debug!("Starting monitor loop every {:?}", self.poll_interval);
        loop {
            self.tick().await;
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::trace!("Shutting down monitor loop");
                    break;
                }
                _ = sleep(self.poll_interval) => {}
            }
        }
        tracing::debug!("Stopped monitor loop");
    }
}

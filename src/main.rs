// Licensed under the Open Software License version 3.0
use config::file::load_config_or_exit;
use monitor::poller::{connect_or_alert, Monitor};
use notify::bark::BarkNotifier;
use shutdown_notifier::start_shutdown_notifier;
use std::process;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
mod config;
mod hid;
mod monitor;
mod notify;
mod shutdown_notifier;
mod ups;

#[tokio::main]
async fn main() {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive("ups_hid_monitor=info".parse().unwrap())
                .from_env_lossy(),
        )
        .init();

    // Exits on missing or malformed settings
    let config = load_config_or_exit();
    let notifier = match BarkNotifier::new(&config.bark) {
        Ok(notifier) => notifier,
        Err(error) => {
            tracing::error!("Invalid configuration: {}", error);
            process::exit(1);
        }
    };

    // Without a device there is nothing to poll
    let Some(device) = connect_or_alert(&config.device, &notifier).await else {
        return;
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let shutdown_notifier_handle = tokio::spawn(async move {
        start_shutdown_notifier(shutdown_tx).await;
    });

    // Device is released when the monitor is dropped, even if the task panics
    let monitor = Monitor::new(device, notifier, &config.device, &config.monitor);
    let monitor_handle = tokio::spawn(async move {
        monitor.run(shutdown_rx).await;
    });

    if let Err(error) = monitor_handle.await {
        tracing::error!("Monitor task failed: {}", error);
    }
    shutdown_notifier_handle.abort();

    tracing::debug!("Successfully shut down");
}

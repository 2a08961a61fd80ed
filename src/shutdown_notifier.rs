// Licensed under the Open Software License version 3.0
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::broadcast::Sender,
};

/// Wait for Ctrl-C or SIGTERM and broadcast a single shutdown message
pub async fn start_shutdown_notifier(tx: Sender<()>) {
    tracing::trace!("Starting shutdown notifier");
    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::debug!("Received interrupt signal"),
                _ = terminate.recv() => tracing::debug!("Received terminate signal"),
            }
        }
        Err(error) => {
            tracing::warn!("Cannot listen for SIGTERM: {}", error);
            let _ = tokio::signal::ctrl_c().await;
            tracing::debug!("Received interrupt signal");
        }
    }
    tracing::trace!("Sending message to {} receivers", tx.receiver_count());
    let _ = tx.send(());
}

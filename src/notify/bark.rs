// Licensed under the Open Software License version 3.0
use super::{
    config::BarkConfig,
    event::{AlertEvent, DeliveryResult, Urgency},
};
use crate::config::error::ConfigError;
use reqwest::{StatusCode, Url};
use std::time::Duration;

/// Sends alerts to a Bark push server
///
/// Every alert is a single `GET {url}/{message}` attempt, failures are
/// reported back and never retried
pub struct BarkNotifier {
    client: reqwest::Client,
    base_url: Url,
    volume: u8,
    timeout: Duration,
}

fn level(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Normal => "active",
        Urgency::Critical => "critical",
    }
}

impl BarkNotifier {
    pub fn new(config: &BarkConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config.get_url()?,
            volume: config.get_volume()?,
            timeout: config.get_timeout(),
        })
    }

    /// Append the message as the last path segment, keeping any query or fragment
    fn build_url(&self, message: &str) -> Url {
        let mut url = self.base_url.clone();
        // http(s) urls always have a path
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(message);
        }
        url
    }

    pub async fn send(&self, event: &AlertEvent) -> DeliveryResult {
        let volume = self.volume.to_string();
        let mut query = vec![("level", level(event.urgency)), ("volume", volume.as_str())];
        if event.continuous_ring {
            query.push(("call", "1"));
        }
        let result = self
            .client
            .get(self.build_url(&event.message))
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await;
        let delivery = match result {
            Ok(response) if response.status() == StatusCode::OK => {
                DeliveryResult::delivered(format!("delivered: {}", event.message))
            }
            Ok(response) => DeliveryResult::failed(format!(
                "got {} response for: {}",
                response.status(),
                event.message
            )),
            Err(error) => DeliveryResult::failed(format!(
                "request failed for {}: {}",
                event.message, error
            )),
        };
        if delivery.ok {
            tracing::info!("Alert {}", delivery.detail);
        } else {
            tracing::warn!("Alert not delivered, {}", delivery.detail);
        }
        delivery
    }
}

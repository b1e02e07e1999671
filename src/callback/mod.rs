//! Out-of-band delivery of finished answers to the platform's callback URL.

use crate::{Error, Result, config::CallbackConfig, server::SkillResponse};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    DeliveryFailed(String),
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

#[derive(Debug, Clone)]
pub struct CallbackDispatcher {
    http: reqwest::Client,
    max_attempts: u32,
}

impl CallbackDispatcher {
    pub fn new(config: &CallbackConfig) -> Result<Self> {
        Self::with_timeout(
            Duration::from_secs(config.timeout_secs),
            config.max_attempts,
        )
    }

    pub fn with_timeout(timeout: Duration, max_attempts: u32) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            max_attempts: max_attempts.max(1),
        })
    }

    /// POSTs `text` wrapped in the response envelope. Failures are logged and returned, never raised.
    pub async fn deliver(&self, callback_url: &str, text: &str) -> Delivery {
        let envelope = SkillResponse::simple_text(text);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match self.post(callback_url, &envelope).await {
                Ok(()) => {
                    info!(attempt, "Delivered answer to callback {}", callback_url);
                    return Delivery::Delivered;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        "Callback delivery to {} failed: {}",
                        callback_url,
                        e
                    );
                    last_error = e.to_string();
                }
            }
        }

        Delivery::DeliveryFailed(last_error)
    }

    async fn post(&self, callback_url: &str, envelope: &SkillResponse) -> Result<()> {
        let response = self.http.post(callback_url).json(envelope).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::callback(format!(
                "callback responded with {}: {}",
                status, body
            )));
        }

        debug!("Callback {} accepted with status {}", callback_url, status);
        Ok(())
    }
}

use crate::{Error, Result};
use lookout_core::WebhookPayload;
use std::time::Duration;
use url::Url;

/// Total budget for the single delivery attempt.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to the one webhook delivery attempt. Delivery is
/// best-effort: a failure here never overrides the run's own status.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub sent: bool,
    pub response_status: Option<u16>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn sent(status: u16) -> Self {
        Self {
            sent: true,
            response_status: Some(status),
            error: None,
        }
    }

    pub fn not_sent(error: String) -> Self {
        Self {
            sent: false,
            response_status: None,
            error: Some(error),
        }
    }
}

/// Delivers the run outcome to the configured webhook. One POST, JSON body,
/// bounded timeout, no retry.
pub struct WebhookReporter {
    client: reqwest::Client,
    url: Url,
}

impl WebhookReporter {
    pub fn new(url: Url) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Make the single delivery attempt. Non-2xx responses count as a
    /// delivery failure.
    pub async fn deliver(&self, payload: &WebhookPayload<'_>) -> DeliveryOutcome {
        tracing::info!(
            status = payload.status.as_str(),
            url = %self.url,
            "delivering result to webhook"
        );

        match self
            .client
            .post(self.url.clone())
            .json(payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                let status = response.status().as_u16();
                tracing::info!(status, "webhook delivered");
                DeliveryOutcome::sent(status)
            }
            Ok(response) => {
                let status = response.status();
                tracing::warn!(%status, "webhook endpoint rejected the payload");
                DeliveryOutcome::not_sent(format!(
                    "webhook endpoint returned status {status}"
                ))
            }
            Err(e) => {
                tracing::warn!("webhook delivery failed: {}", e);
                DeliveryOutcome::not_sent(e.to_string())
            }
        }
    }
}

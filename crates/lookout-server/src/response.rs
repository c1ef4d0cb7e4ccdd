use crate::webhook::DeliveryOutcome;
use chrono::{DateTime, Utc};
use lookout_core::{RunDetails, RunResult, RunStatus};
use serde::Serialize;

/// JSON body returned to whoever triggered the invocation. The transport
/// status is always 200; this body is the only place success and failure
/// are distinguishable.
#[derive(Debug, Serialize)]
pub struct InvocationResponse {
    /// Mirrors webhook delivery: the invocation "succeeded" when the result
    /// reached the webhook, whatever the run status was.
    pub success: bool,
    pub status: RunStatus,
    pub webhook_sent: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_response_status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_error: Option<String>,

    pub timestamp: DateTime<Utc>,
    pub details: RunDetails,
    pub error: Option<String>,
}

impl InvocationResponse {
    pub fn from_parts(result: RunResult, delivery: DeliveryOutcome) -> Self {
        Self {
            success: delivery.sent,
            status: result.status,
            webhook_sent: delivery.sent,
            webhook_response_status: delivery.response_status,
            webhook_error: delivery.error,
            timestamp: Utc::now(),
            details: result.details,
            error: result.error,
        }
    }

    /// Response for a configuration whose webhook URL itself is unusable.
    /// The one case where no webhook delivery is attempted: any other parse
    /// failure is still delivered to the webhook.
    pub fn config_failure(error: &str) -> Self {
        Self {
            success: false,
            status: RunStatus::Ko,
            webhook_sent: false,
            webhook_response_status: None,
            webhook_error: Some("delivery not attempted: no usable webhook URL".to_string()),
            timestamp: Utc::now(),
            details: RunDetails::default(),
            error: Some(error.to_string()),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary outcome of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "KO")]
    Ko,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Ok => "OK",
            RunStatus::Ko => "KO",
        }
    }
}

/// Diagnostic metadata gathered along the run. Absent fields are omitted
/// from the serialized form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_success: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_annonces: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annonce_found: Option<bool>,

    /// Name of the detection strategy that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_hits: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_captured: Option<bool>,

    /// Error taxonomy name when the run failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Outcome of one check run. Produced exactly once per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub status: RunStatus,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
    pub details: RunDetails,
}

impl RunResult {
    /// A completed run: `OK` when the listing was found, `KO` otherwise.
    /// A miss is a legitimate negative result, not an error.
    pub fn completed(found: bool, details: RunDetails) -> Self {
        Self {
            status: if found { RunStatus::Ok } else { RunStatus::Ko },
            timestamp: Utc::now(),
            error: None,
            details,
        }
    }

    /// A run that failed partway through.
    pub fn failed(error: String, details: RunDetails) -> Self {
        Self {
            status: RunStatus::Ko,
            timestamp: Utc::now(),
            error: Some(error),
            details,
        }
    }
}

/// Body of the outbound webhook notification, sent exactly once per run.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub status: RunStatus,
    pub timestamp: DateTime<Utc>,
    pub url_checked: &'a str,
    pub details: &'a RunDetails,
    pub error: Option<&'a str>,
}

impl<'a> WebhookPayload<'a> {
    pub fn for_run(result: &'a RunResult, url_checked: &'a str) -> Self {
        Self {
            status: result.status,
            timestamp: result.timestamp,
            url_checked,
            details: &result.details,
            error: result.error.as_deref(),
        }
    }
}

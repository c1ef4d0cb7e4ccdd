use crate::response::InvocationResponse;
use crate::webhook::{DeliveryOutcome, WebhookReporter};
use lookout_core::config::DEFAULT_TARGET_URL;
use lookout_core::{webhook_url_from_lookup, RunConfig, RunDetails, RunResult, WebhookPayload};

/// Run one complete invocation: read configuration from the environment,
/// perform the check, deliver the result to the webhook, shape the response.
pub async fn run_invocation() -> InvocationResponse {
    match RunConfig::from_env() {
        Ok(config) => run_invocation_with(&config).await,
        Err(e) => {
            tracing::warn!("invocation rejected: {}", e);
            report_config_failure(&e, |key| std::env::var(key).ok()).await
        }
    }
}

/// Invocation body once a configuration exists. The webhook delivery is
/// attempted exactly once, even when the run itself failed, so the failure
/// reaches the webhook too.
pub async fn run_invocation_with(config: &RunConfig) -> InvocationResponse {
    let result = lookout_browser::run_check(config).await;

    let delivery = match WebhookReporter::new(config.webhook_url.clone()) {
        Ok(reporter) => {
            let payload = WebhookPayload::for_run(&result, config.target_url.as_str());
            reporter.deliver(&payload).await
        }
        Err(e) => DeliveryOutcome::not_sent(e.to_string()),
    };

    InvocationResponse::from_parts(result, delivery)
}

/// A configuration that failed to parse still gets its one webhook delivery
/// when the webhook URL itself is usable. Only an unusable webhook URL makes
/// delivery impossible.
async fn report_config_failure<F>(error: &lookout_core::Error, lookup: F) -> InvocationResponse
where
    F: Fn(&str) -> Option<String>,
{
    let Ok(webhook_url) = webhook_url_from_lookup(&lookup) else {
        return InvocationResponse::config_failure(&error.to_string());
    };

    let details = RunDetails {
        error_type: Some("ConfigError".to_string()),
        ..Default::default()
    };
    let result = RunResult::failed(error.to_string(), details);
    let url_checked =
        lookup("LOOKOUT_TARGET_URL").unwrap_or_else(|| DEFAULT_TARGET_URL.to_string());

    let delivery = match WebhookReporter::new(webhook_url) {
        Ok(reporter) => {
            let payload = WebhookPayload::for_run(&result, &url_checked);
            reporter.deliver(&payload).await
        }
        Err(e) => DeliveryOutcome::not_sent(e.to_string()),
    };

    InvocationResponse::from_parts(result, delivery)
}

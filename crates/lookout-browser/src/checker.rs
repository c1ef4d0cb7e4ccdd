use crate::session::BrowserSession;
use crate::{listing, login, Result};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use lookout_core::{RunConfig, RunDetails, RunResult};

/// Run one full check: authenticate, locate the listing, optionally capture
/// a screenshot. Every failure collapses into a `KO` result with a captured
/// error message; this function never returns an error and never panics.
pub async fn run_check(config: &RunConfig) -> RunResult {
    tracing::info!(target_url = %config.target_url, "starting check");

    let mut details = RunDetails::default();
    match drive(config, &mut details).await {
        Ok(found) => {
            let result = RunResult::completed(found, details);
            tracing::info!(status = result.status.as_str(), "check finished");
            result
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), "check failed: {}", e);
            details.error_type = Some(e.kind().to_string());
            RunResult::failed(e.to_string(), details)
        }
    }
}

/// Acquire the browser session, run the steps, and guarantee exactly one
/// teardown on every exit path.
async fn drive(config: &RunConfig, details: &mut RunDetails) -> Result<bool> {
    // Credential invariant holds before any browser action.
    config.validate()?;

    let session = BrowserSession::launch(config).await?;
    let outcome = run_steps(&session, config, details).await;
    session.close().await;
    outcome
}

async fn run_steps(
    session: &BrowserSession,
    config: &RunConfig,
    details: &mut RunDetails,
) -> Result<bool> {
    login::log_in(session, config).await?;
    details.login_success = Some(true);

    let found = listing::locate_listing(session, config, details).await?;

    if config.capture_screenshot {
        capture_screenshot(session, details).await;
    }

    Ok(found)
}

/// Best-effort full-page screenshot of the listing page. A capture failure
/// is logged but never fails the run.
async fn capture_screenshot(session: &BrowserSession, details: &mut RunDetails) {
    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();

    match session.page().screenshot(params).await {
        Ok(bytes) => {
            tracing::info!(bytes = bytes.len(), "screenshot captured");
            details.screenshot_captured = Some(true);
        }
        Err(e) => {
            tracing::warn!("screenshot capture failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_credentials() -> RunConfig {
        RunConfig::from_lookup(|_| None).expect("defaults always parse")
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_browser_action() {
        // No Chrome is available in unit tests; reaching the launch step
        // would produce a BrowserError instead of the expected ConfigError.
        let result = run_check(&config_without_credentials()).await;

        assert_eq!(result.status.as_str(), "KO");
        assert!(result.error.unwrap().contains("credentials"));
        assert_eq!(result.details.error_type.as_deref(), Some("ConfigError"));
        assert!(result.details.login_success.is_none());
    }
}

use crate::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType, SetBlockedUrLsParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use lookout_core::{selectors, RunConfig};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Navigation waits, including the joint submit-and-wait step.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Chrome stability flags for constrained environments.
const CHROME_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--disable-gpu",
];

/// A scoped browser session: acquired at the start of an invocation and
/// unconditionally released before the invocation completes.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launch Chrome and prepare a single page for the check.
    pub async fn launch(config: &RunConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .args(CHROME_ARGS.iter().copied());

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(Error::Cdp)?;

        tracing::info!(headless = config.headless, "launching browser");
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        // The handler stream must be drained for any CDP command to settle.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    // Some CDP events are not fully parseable; keep going.
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.set_user_agent(USER_AGENT).await?;

        // Network domain is needed both for response inspection and for
        // asset blocking.
        page.execute(EnableParams::default()).await?;
        page.execute(SetBlockedUrLsParams::new(
            selectors::BLOCKED_URL_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>(),
        ))
        .await?;
        tracing::debug!(
            patterns = selectors::BLOCKED_URL_PATTERNS.len(),
            "non-essential asset types blocked"
        );

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigate to `url` and verify the document response succeeded.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tracing::info!(%url, "navigating");

        let mut responses = self.page.event_listener::<EventResponseReceived>().await?;

        tokio::time::timeout(NAVIGATION_TIMEOUT, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, Error>(())
        })
        .await
        .map_err(|_| Error::Navigation(format!("timed out loading {url}")))??;

        // Drain the buffered events for the document response. The page has
        // finished loading, so the response is either already queued or the
        // short grace period below catches it.
        let deadline = tokio::time::Instant::now() + Duration::from_millis(500);
        while let Ok(Some(event)) =
            tokio::time::timeout_at(deadline, responses.next()).await
        {
            if event.r#type != ResourceType::Document {
                continue;
            }
            let status = event.response.status;
            tracing::debug!(url = %event.response.url, status, "document response");
            if event.response.url.starts_with(url) && status >= 400 {
                return Err(Error::Navigation(format!(
                    "page {url} returned HTTP status {status}"
                )));
            }
        }

        Ok(())
    }

    /// Tear the session down. Called on every exit path; failures here are
    /// logged and swallowed so they never mask the run's own outcome.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("browser process wait failed: {}", e);
        }
        self.handler_task.abort();
        tracing::info!("browser session closed");
    }
}

use crate::session::BrowserSession;
use crate::{Error, Result};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use lookout_core::{selectors, RunConfig};
use std::time::Duration;

/// Bounded wait per candidate selector.
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Pause after page loads; the form scripts need a moment to settle.
const LOGIN_SETTLE: Duration = Duration::from_secs(2);
const POST_SUBMIT_SETTLE: Duration = Duration::from_secs(3);

/// Authenticate against the login form.
///
/// Mutating the browser session state (cookies) is the point of this step:
/// it establishes the authenticated session the listing page requires.
pub async fn log_in(session: &BrowserSession, config: &RunConfig) -> Result<()> {
    let page = session.page();

    session.navigate(config.login_url.as_str()).await?;
    tokio::time::sleep(LOGIN_SETTLE).await;

    tracing::info!("locating login form fields");
    let username_field = find_first(page, selectors::USERNAME_SELECTORS)
        .await?
        .ok_or_else(|| Error::ElementNotFound("username field".to_string()))?;
    let password_field = find_first(page, selectors::PASSWORD_SELECTORS)
        .await?
        .ok_or_else(|| Error::ElementNotFound("password field".to_string()))?;

    tracing::info!("entering credentials");
    username_field.click().await?;
    username_field.type_str(&config.username).await?;
    password_field.click().await?;
    password_field.type_str(&config.password).await?;

    // Submit and wait for the resulting page load as one joint step.
    tracing::info!("submitting login form");
    match find_first(page, selectors::SUBMIT_SELECTORS).await? {
        Some(button) => {
            button.click().await?;
        }
        None => {
            tracing::debug!("no submit control found, pressing Enter instead");
            password_field.press_key("Enter").await?;
        }
    }
    tokio::time::timeout(crate::session::NAVIGATION_TIMEOUT, page.wait_for_navigation())
        .await
        .map_err(|_| Error::Navigation("timed out waiting for post-login page".to_string()))??;
    tokio::time::sleep(POST_SUBMIT_SETTLE).await;

    let current_url = page.url().await?.unwrap_or_default();
    tracing::debug!(%current_url, "post-submit URL");

    if looks_like_login_url(&current_url) {
        let reason = scrape_error_text(page)
            .await
            .unwrap_or_else(|| "check the credentials".to_string());
        return Err(Error::Authentication(reason));
    }

    tracing::info!("authenticated");
    Ok(())
}

/// Try each candidate selector in priority order, returning the first one
/// that resolves to a visible element within its bounded wait.
pub async fn find_first(page: &Page, candidates: &[&str]) -> Result<Option<Element>> {
    for selector in candidates {
        let deadline = tokio::time::Instant::now() + ELEMENT_TIMEOUT;
        loop {
            if is_visible(page, selector).await? {
                if let Ok(element) = page.find_element(*selector).await {
                    tracing::debug!(selector, "element found");
                    return Ok(Some(element));
                }
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::debug!(selector, "no visible match, trying next candidate");
                break;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
    Ok(None)
}

/// Probe whether a selector currently resolves to a visible element.
async fn is_visible(page: &Page, selector: &str) -> Result<bool> {
    let result = page.evaluate(visibility_probe(selector)).await?;
    Ok(result.into_value::<bool>().unwrap_or(false))
}

fn visibility_probe(selector: &str) -> String {
    // serde_json handles the quoting so arbitrary selectors stay valid JS.
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(() => {{ \
            const el = document.querySelector({quoted}); \
            if (!el) return false; \
            const style = window.getComputedStyle(el); \
            return style.display !== 'none' \
                && style.visibility !== 'hidden' \
                && el.offsetParent !== null; \
        }})()"
    )
}

/// True when a URL still points at the login page.
pub fn looks_like_login_url(url: &str) -> bool {
    selectors::LOGIN_PATH_MARKERS
        .iter()
        .any(|marker| url.contains(marker))
}

/// Scrape a visible error message from the usual error containers.
async fn scrape_error_text(page: &Page) -> Option<String> {
    let containers = selectors::ERROR_CONTAINER_SELECTORS.join(", ");
    let quoted = serde_json::to_string(&containers).unwrap_or_else(|_| "\"\"".to_string());
    let probe = format!(
        "(() => {{ \
            const nodes = document.querySelectorAll({quoted}); \
            for (const el of nodes) {{ \
                const text = (el.textContent || '').trim(); \
                if (text) return text; \
            }} \
            return null; \
        }})()"
    );

    match page.evaluate(probe).await {
        Ok(result) => result.into_value::<Option<String>>().ok().flatten(),
        Err(e) => {
            tracing::debug!("error-text scrape failed: {}", e);
            None
        }
    }
}

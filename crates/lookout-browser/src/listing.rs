use crate::session::BrowserSession;
use crate::Result;
use lookout_core::{RunConfig, RunDetails};
use lookout_detect::{detect_listing, Anchor};
use std::time::Duration;

/// Pause after the listing page load so late-rendered entries are present.
const LISTING_SETTLE: Duration = Duration::from_secs(3);

const ANCHOR_SCRAPE: &str = r#"(() =>
    Array.from(document.querySelectorAll('a')).map(a => ({
        href: a.href || '',
        text: a.textContent || ''
    }))
)()"#;

/// Navigate to the listing index and determine whether the target listing
/// is present. Returns the detection verdict and fills in the run details.
pub async fn locate_listing(
    session: &BrowserSession,
    config: &RunConfig,
    details: &mut RunDetails,
) -> Result<bool> {
    session.navigate(config.target_url.as_str()).await?;
    tokio::time::sleep(LISTING_SETTLE).await;

    let anchors = scrape_anchors(session).await?;
    tracing::debug!(anchors = anchors.len(), "scraped page anchors");

    let report = detect_listing(&anchors, &config.target, config.keyword_threshold);

    details.total_annonces = Some(report.total_listing_anchors);
    details.annonce_found = Some(report.matched.is_some());
    tracing::info!(
        total = report.total_listing_anchors,
        "listing anchors on page"
    );

    if let Some(hit) = report.matched {
        details.method = Some(hit.method.as_str().to_string());
        details.matched_text = Some(hit.matched_text);
        details.keyword_hits = hit.keyword_hits;
        return Ok(true);
    }

    Ok(false)
}

/// Pull every anchor's resolved href and text out of the rendered document
/// in a single evaluation.
async fn scrape_anchors(session: &BrowserSession) -> Result<Vec<Anchor>> {
    let result = session.page().evaluate(ANCHOR_SCRAPE).await?;
    result
        .into_value::<Vec<Anchor>>()
        .map_err(|e| crate::Error::Cdp(format!("anchor scrape returned unexpected shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_scrape_resolves_hrefs() {
        // `a.href` (not getAttribute) so relative listing links come back
        // as absolute URLs, matching what the strategies expect.
        assert!(ANCHOR_SCRAPE.contains("a.href"));
        assert!(!ANCHOR_SCRAPE.contains("getAttribute"));
    }
}

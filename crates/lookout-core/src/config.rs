use crate::{Error, Result};
use std::path::PathBuf;
use url::Url;

/// Default endpoints for the watched site. Each can be overridden through
/// the environment for local testing.
pub const DEFAULT_LOGIN_URL: &str = "https://www.abcdent.pro/connexion";
pub const DEFAULT_TARGET_URL: &str = "https://www.abcdent.pro/mon_compte/classifieds?s=published";
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://n8n.cemedis.app/webhook/d8fabe02-3a4f-4778-b2af-c291af88a731";

/// Minimum keyword hits for the keyword-overlap strategy. A policy constant,
/// not derived from anything.
pub const DEFAULT_KEYWORD_THRESHOLD: usize = 5;

/// The listing we are watching for on the index page.
#[derive(Debug, Clone)]
pub struct ListingTarget {
    /// Path fragment of the listing's detail page, matched against raw hrefs.
    pub path_fragment: String,
    /// Human-readable title, matched against normalized anchor text.
    pub title: String,
    /// Unique numeric identifier embedded in the listing URL.
    pub id: String,
    /// Role terms and geographic codes describing the listing.
    pub keywords: Vec<String>,
    /// Generic path segment shared by all listing detail pages.
    pub index_segment: String,
}

impl Default for ListingTarget {
    fn default() -> Self {
        Self {
            path_fragment: "/annonces/352084-recrutement-chirurgien-dentiste-75-77-91-92-94-h-f"
                .to_string(),
            title: "Recrutement chirurgien dentiste 75 77 91 92 94 h/f".to_string(),
            id: "352084".to_string(),
            keywords: [
                "recrutement",
                "chirurgien",
                "dentiste",
                "75",
                "77",
                "91",
                "92",
                "94",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            index_segment: "/annonces/".to_string(),
        }
    }
}

/// Immutable per-invocation configuration, sourced from the environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub login_url: Url,
    pub target_url: Url,
    pub webhook_url: Url,
    pub username: String,
    pub password: String,
    pub headless: bool,
    pub capture_screenshot: bool,
    pub keyword_threshold: usize,
    pub chrome_executable: Option<PathBuf>,
    pub target: ListingTarget,
}

impl RunConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Credentials are
    /// allowed to be empty here; `validate` enforces them before any browser
    /// action so the failure can still be reported downstream.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let login_url = url_var(&lookup, "LOOKOUT_LOGIN_URL", DEFAULT_LOGIN_URL)?;
        let target_url = url_var(&lookup, "LOOKOUT_TARGET_URL", DEFAULT_TARGET_URL)?;
        let webhook_url = url_var(&lookup, "LOOKOUT_WEBHOOK_URL", DEFAULT_WEBHOOK_URL)?;

        let keyword_threshold = match lookup("LOOKOUT_KEYWORD_THRESHOLD") {
            Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidValue {
                var: "LOOKOUT_KEYWORD_THRESHOLD".to_string(),
                value: raw,
            })?,
            None => DEFAULT_KEYWORD_THRESHOLD,
        };

        // Headed only in development; everything else runs headless.
        let headless = lookup("LOOKOUT_ENV").as_deref() != Some("development");

        let capture_screenshot = matches!(
            lookup("CAPTURE_SCREENSHOT").as_deref(),
            Some("true") | Some("1")
        );

        tracing::debug!(headless, capture_screenshot, keyword_threshold, "run configuration assembled");

        Ok(Self {
            login_url,
            target_url,
            webhook_url,
            username: lookup("ABCDENT_USERNAME").unwrap_or_default(),
            password: lookup("ABCDENT_PASSWORD").unwrap_or_default(),
            headless,
            capture_screenshot,
            keyword_threshold,
            chrome_executable: lookup("LOOKOUT_CHROME").map(PathBuf::from),
            target: ListingTarget::default(),
        })
    }

    /// Check the credential invariant. Must pass before any browser action.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(())
    }
}

/// Extract just the webhook URL from a key lookup. When the rest of the
/// configuration fails to parse, the failure itself can still be delivered
/// as long as this one value is usable.
pub fn webhook_url_from_lookup<F>(lookup: F) -> Result<Url>
where
    F: Fn(&str) -> Option<String>,
{
    url_var(&lookup, "LOOKOUT_WEBHOOK_URL", DEFAULT_WEBHOOK_URL)
}

fn url_var<F>(lookup: &F, var: &str, default: &str) -> Result<Url>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(var).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|source| Error::InvalidUrl {
        var: var.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = RunConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.login_url.as_str(), DEFAULT_LOGIN_URL);
        assert_eq!(config.target_url.as_str(), DEFAULT_TARGET_URL);
        assert_eq!(config.webhook_url.as_str(), DEFAULT_WEBHOOK_URL);
        assert_eq!(config.keyword_threshold, DEFAULT_KEYWORD_THRESHOLD);
        assert!(config.headless);
        assert!(!config.capture_screenshot);
        assert!(config.chrome_executable.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        let config = RunConfig::from_lookup(lookup_from(&[])).unwrap();
        assert!(matches!(
            config.validate(),
            Err(Error::MissingCredentials)
        ));

        let config = RunConfig::from_lookup(lookup_from(&[("ABCDENT_USERNAME", "user")]))
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_full_credentials() {
        let config = RunConfig::from_lookup(lookup_from(&[
            ("ABCDENT_USERNAME", "user"),
            ("ABCDENT_PASSWORD", "secret"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_mode_runs_headed() {
        let config =
            RunConfig::from_lookup(lookup_from(&[("LOOKOUT_ENV", "development")])).unwrap();
        assert!(!config.headless);

        let config =
            RunConfig::from_lookup(lookup_from(&[("LOOKOUT_ENV", "production")])).unwrap();
        assert!(config.headless);
    }

    #[test]
    fn test_screenshot_flag_parses() {
        for value in ["true", "1"] {
            let config =
                RunConfig::from_lookup(lookup_from(&[("CAPTURE_SCREENSHOT", value)])).unwrap();
            assert!(config.capture_screenshot, "value {value:?} should enable");
        }

        let config =
            RunConfig::from_lookup(lookup_from(&[("CAPTURE_SCREENSHOT", "no")])).unwrap();
        assert!(!config.capture_screenshot);
    }

    #[test]
    fn test_invalid_url_override_is_a_config_error() {
        let result = RunConfig::from_lookup(lookup_from(&[("LOOKOUT_WEBHOOK_URL", "not a url")]));
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_webhook_url_survives_other_config_errors() {
        let lookup = lookup_from(&[
            ("LOOKOUT_KEYWORD_THRESHOLD", "five"),
            ("LOOKOUT_WEBHOOK_URL", "http://127.0.0.1:9/webhook"),
        ]);

        assert!(RunConfig::from_lookup(&lookup).is_err());
        let url = webhook_url_from_lookup(&lookup).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/webhook");

        let lookup = lookup_from(&[("LOOKOUT_WEBHOOK_URL", "not a url")]);
        assert!(webhook_url_from_lookup(&lookup).is_err());
    }

    #[test]
    fn test_invalid_threshold_is_a_config_error() {
        let result =
            RunConfig::from_lookup(lookup_from(&[("LOOKOUT_KEYWORD_THRESHOLD", "five")]));
        assert!(matches!(result, Err(Error::InvalidValue { .. })));

        let config =
            RunConfig::from_lookup(lookup_from(&[("LOOKOUT_KEYWORD_THRESHOLD", "3")])).unwrap();
        assert_eq!(config.keyword_threshold, 3);
    }
}

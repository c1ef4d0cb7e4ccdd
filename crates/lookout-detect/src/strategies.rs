//! Ordered detection strategies for the target listing.
//!
//! Each strategy is an independent predicate over the scraped anchors,
//! strictly more lenient than the one before it. They run in a fixed order
//! and the first hit short-circuits the rest. Multiple independent signals
//! keep a single markup change from turning into a false negative.

use lazy_static::lazy_static;
use lookout_core::ListingTarget;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// One `<a>` element scraped from the rendered listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub text: String,
}

/// Detection strategies, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    HrefExact,
    TextMatch,
    IdMatch,
    KeywordMatch,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::HrefExact => "href_exact",
            MatchMethod::TextMatch => "text_match",
            MatchMethod::IdMatch => "id_match",
            MatchMethod::KeywordMatch => "keyword_match",
        }
    }
}

/// A successful strategy hit plus its diagnostic metadata.
#[derive(Debug, Clone)]
pub struct StrategyMatch {
    pub method: MatchMethod,
    pub matched_text: String,
    pub keyword_hits: Option<usize>,
}

/// Result of running the full strategy chain over one page.
#[derive(Debug, Clone)]
pub struct DetectionReport {
    pub matched: Option<StrategyMatch>,
    /// Count of listing anchors on the page, recorded regardless of outcome.
    pub total_listing_anchors: usize,
}

/// Run the strategy chain in order, short-circuiting on the first hit.
pub fn detect_listing(
    anchors: &[Anchor],
    target: &ListingTarget,
    keyword_threshold: usize,
) -> DetectionReport {
    let total_listing_anchors = anchors
        .iter()
        .filter(|a| a.href.contains(&target.index_segment))
        .count();

    let matched = match_href_exact(anchors, target)
        .or_else(|| match_text(anchors, target))
        .or_else(|| match_identifier(anchors, target))
        .or_else(|| match_keywords(anchors, target, keyword_threshold));

    match &matched {
        Some(hit) => tracing::info!(
            method = hit.method.as_str(),
            text = %hit.matched_text,
            "listing matched"
        ),
        None => tracing::info!("listing not found by any strategy"),
    }

    DetectionReport {
        matched,
        total_listing_anchors,
    }
}

/// Strategy 1: the anchor's resolved URL contains the known path fragment.
fn match_href_exact(anchors: &[Anchor], target: &ListingTarget) -> Option<StrategyMatch> {
    anchors
        .iter()
        .find(|a| !a.href.is_empty() && a.href.contains(&target.path_fragment))
        .map(|a| StrategyMatch {
            method: MatchMethod::HrefExact,
            matched_text: a.text.trim().to_string(),
            keyword_hits: None,
        })
}

/// Strategy 2: normalized anchor text equals or contains the target title.
fn match_text(anchors: &[Anchor], target: &ListingTarget) -> Option<StrategyMatch> {
    let wanted = normalize(&target.title);

    anchors
        .iter()
        .find(|a| {
            let text = normalize(&a.text);
            !text.is_empty() && (text == wanted || text.contains(&wanted))
        })
        .map(|a| StrategyMatch {
            method: MatchMethod::TextMatch,
            matched_text: a.text.trim().to_string(),
            keyword_hits: None,
        })
}

/// Strategy 3: among listing anchors only, the URL carries the target id.
fn match_identifier(anchors: &[Anchor], target: &ListingTarget) -> Option<StrategyMatch> {
    anchors
        .iter()
        .filter(|a| a.href.contains(&target.index_segment))
        .find(|a| a.href.contains(&target.id))
        .map(|a| StrategyMatch {
            method: MatchMethod::IdMatch,
            matched_text: a.text.trim().to_string(),
            keyword_hits: None,
        })
}

/// Strategy 4: at least `threshold` keywords appear in the anchor text.
fn match_keywords(
    anchors: &[Anchor],
    target: &ListingTarget,
    threshold: usize,
) -> Option<StrategyMatch> {
    anchors.iter().find_map(|a| {
        let text = a.text.to_lowercase();
        let hits = target
            .keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count();

        if hits >= threshold {
            Some(StrategyMatch {
                method: MatchMethod::KeywordMatch,
                matched_text: a.text.trim().to_string(),
                keyword_hits: Some(hits),
            })
        } else {
            None
        }
    })
}

/// Trim, collapse whitespace runs and case-fold.
fn normalize(text: &str) -> String {
    WHITESPACE
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ListingTarget {
        ListingTarget::default()
    }

    fn anchor(href: &str, text: &str) -> Anchor {
        Anchor {
            href: href.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_href_exact_match() {
        let anchors = vec![
            anchor("https://www.abcdent.pro/annonces/100-autre", "Autre annonce"),
            anchor(
                "https://www.abcdent.pro/annonces/352084-recrutement-chirurgien-dentiste-75-77-91-92-94-h-f",
                "  Recrutement chirurgien dentiste  ",
            ),
        ];

        let report = detect_listing(&anchors, &target(), 5);
        let hit = report.matched.unwrap();
        assert_eq!(hit.method, MatchMethod::HrefExact);
        assert_eq!(hit.matched_text, "Recrutement chirurgien dentiste");
        assert_eq!(report.total_listing_anchors, 2);
    }

    #[test]
    fn test_text_match_ignores_case_and_whitespace() {
        let anchors = vec![anchor(
            "https://www.abcdent.pro/offres/352084",
            "RECRUTEMENT   Chirurgien\n dentiste 75 77  91 92 94 H/F",
        )];

        let report = detect_listing(&anchors, &target(), 5);
        let hit = report.matched.unwrap();
        assert_eq!(hit.method, MatchMethod::TextMatch);
    }

    #[test]
    fn test_id_match_is_scoped_to_listing_anchors() {
        // The id appears in a non-listing URL: no id match. Keyword text is
        // kept away from the threshold too, so the chain misses entirely.
        let anchors = vec![anchor("https://www.abcdent.pro/profil/352084", "Profil")];
        let report = detect_listing(&anchors, &target(), 5);
        assert!(report.matched.is_none());
        assert_eq!(report.total_listing_anchors, 0);

        let anchors = vec![anchor(
            "https://www.abcdent.pro/annonces/352084-titre-modifie",
            "Titre modifié",
        )];
        let report = detect_listing(&anchors, &target(), 5);
        assert_eq!(report.matched.unwrap().method, MatchMethod::IdMatch);
    }

    #[test]
    fn test_keyword_threshold_boundary() {
        // Four keyword hits: recrutement, chirurgien, 75, 77.
        let four = vec![anchor(
            "https://www.abcdent.pro/annonces/999999-offre",
            "Recrutement chirurgien secteurs 75 et 77",
        )];
        assert!(detect_listing(&four, &target(), 5).matched.is_none());

        // Five hits: recrutement, chirurgien, dentiste, 75, 77.
        let five = vec![anchor(
            "https://www.abcdent.pro/annonces/999999-offre",
            "Recrutement chirurgien dentiste secteurs 75 et 77",
        )];
        let hit = detect_listing(&five, &target(), 5).matched.unwrap();
        assert_eq!(hit.method, MatchMethod::KeywordMatch);
        assert_eq!(hit.keyword_hits, Some(5));
    }

    #[test]
    fn test_threshold_is_a_policy_knob() {
        let anchors = vec![anchor(
            "https://www.abcdent.pro/annonces/999999-offre",
            "Recrutement chirurgien secteurs 75 et 77",
        )];
        // Same page, lower threshold: now a hit.
        let hit = detect_listing(&anchors, &target(), 4).matched.unwrap();
        assert_eq!(hit.keyword_hits, Some(4));
    }

    #[test]
    fn test_strategy_order_is_fixed() {
        // This anchor satisfies every strategy; the recorded method must be
        // the first one in the chain.
        let anchors = vec![anchor(
            "https://www.abcdent.pro/annonces/352084-recrutement-chirurgien-dentiste-75-77-91-92-94-h-f",
            "Recrutement chirurgien dentiste 75 77 91 92 94 h/f",
        )];

        let hit = detect_listing(&anchors, &target(), 5).matched.unwrap();
        assert_eq!(hit.method, MatchMethod::HrefExact);
    }

    #[test]
    fn test_absent_listing_counts_anchors_anyway() {
        let anchors: Vec<Anchor> = (0..12)
            .map(|i| {
                anchor(
                    &format!("https://www.abcdent.pro/annonces/{i}-autre-offre"),
                    &format!("Offre {i}"),
                )
            })
            .collect();

        let report = detect_listing(&anchors, &target(), 5);
        assert!(report.matched.is_none());
        assert_eq!(report.total_listing_anchors, 12);
    }

    #[test]
    fn test_empty_page() {
        let report = detect_listing(&[], &target(), 5);
        assert!(report.matched.is_none());
        assert_eq!(report.total_listing_anchors, 0);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  A\tB \n C  "), "a b c");
        assert_eq!(normalize("Déjà  Vu"), "déjà vu");
    }
}

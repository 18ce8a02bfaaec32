//! Heuristic scoring of onward links from a landing page

use url::Url;

use crate::config::ScoringWeights;
use crate::html::{Element, Page};
use crate::url::same_host;

/// A scored anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    pub url: Url,
    pub anchor_text: String,
    pub score: i32,

    /// How the score was reached; never `Disqualified`
    pub kind: LinkScore,
}

impl CandidateLink {
    pub fn is_jackpot(&self) -> bool {
        self.kind == LinkScore::Jackpot
    }
}

/// Outcome of scoring one anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkScore {
    /// Mentions an excluded section; never selectable
    Disqualified,

    /// A direct PCF PDF; accepted outright
    Jackpot,

    /// Ordinary accumulated score
    Points(i32),
}

impl LinkScore {
    /// Numeric value, `None` for disqualified links
    pub fn value(self, weights: &ScoringWeights) -> Option<i32> {
        match self {
            LinkScore::Disqualified => None,
            LinkScore::Jackpot => Some(weights.jackpot_score),
            LinkScore::Points(points) => Some(points),
        }
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(&n.to_lowercase()))
}

/// Picks the link most likely to lead to a brand's PCF listing
#[derive(Debug, Clone, Default)]
pub struct LinkScorer {
    weights: ScoringWeights,
}

impl LinkScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Scores one link
    ///
    /// # Arguments
    ///
    /// * `base` - URL of the page the link was found on
    /// * `href` - Raw href attribute
    /// * `resolved` - `href` resolved against `base`
    /// * `text` - Visible anchor text
    pub fn score(&self, base: &Url, href: &str, resolved: &Url, text: &str) -> LinkScore {
        let w = &self.weights;
        let s = format!("{} {}", text.trim(), resolved).to_lowercase();

        if contains_any(&s, &w.exclusion_terms) {
            return LinkScore::Disqualified;
        }

        if href.to_lowercase().ends_with(".pdf") && contains_any(&s, &w.pdf_indicators) {
            return LinkScore::Jackpot;
        }

        let mut score = 0;

        if contains_any(&s, &w.strong_terms) {
            score += w.strong_bonus;
        }

        let family = w.family_term.to_lowercase();
        if contains_any(&s, &w.category_terms) || (!family.is_empty() && s.contains(&family)) {
            score += w.category_bonus;
        }

        if !same_host(base, resolved) {
            score -= w.foreign_host_penalty;
        }

        if resolved.as_str().starts_with(base.as_str().trim_end_matches('/')) {
            score += w.path_prefix_bonus;
        }

        if href.contains('#') {
            score += w.fragment_bonus;
        }

        LinkScore::Points(score)
    }

    fn candidate(&self, page: &Page, anchor: Element<'_>) -> Option<CandidateLink> {
        let href = anchor.href()?;
        if href.trim().is_empty() {
            return None;
        }
        let resolved = page.resolve(href)?;
        let text = anchor.text();
        let kind = self.score(page.url(), href, &resolved, &text);
        let score = kind.value(&self.weights)?;

        Some(CandidateLink {
            url: resolved,
            anchor_text: text,
            score,
            kind,
        })
    }

    /// Highest-scoring anchor on the page, if any anchor is selectable
    ///
    /// Ties keep the first anchor seen. The first jackpot is returned as
    /// soon as it is seen, whatever the points of the anchors before it.
    pub fn best_candidate(&self, page: &Page) -> Option<CandidateLink> {
        let mut best: Option<CandidateLink> = None;

        for anchor in page.anchors() {
            let Some(candidate) = self.candidate(page, anchor) else {
                continue;
            };
            if candidate.is_jackpot() {
                return Some(candidate);
            }
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        best
    }

    /// The onward URL to follow, or the page's own URL
    ///
    /// A jackpot is always accepted; any other candidate only when its score
    /// reaches the acceptance threshold.
    pub fn best_link(&self, page: &Page) -> Url {
        match self.best_candidate(page) {
            Some(best) if best.is_jackpot() || best.score >= self.weights.acceptance_threshold => {
                tracing::info!(
                    "Following best link (score {}) -> {}",
                    best.score,
                    best.url
                );
                best.url
            }
            _ => {
                tracing::info!("Staying on landing page (no strong PCF link found)");
                page.url().clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LinkScorer {
        LinkScorer::new(ScoringWeights::default())
    }

    fn landing() -> Url {
        Url::parse("https://www.brand.com/sustainability/").unwrap()
    }

    fn score_of(href: &str, text: &str) -> LinkScore {
        let base = landing();
        let resolved = base.join(href).unwrap();
        scorer().score(&base, href, &resolved, text)
    }

    #[test]
    fn test_exclusion_disqualifies() {
        assert_eq!(
            score_of("/support/pcf", "Product carbon footprint"),
            LinkScore::Disqualified
        );
        assert_eq!(score_of("/about", "Contact us"), LinkScore::Disqualified);
    }

    #[test]
    fn test_jackpot_for_direct_pcf_pdf() {
        assert_eq!(
            score_of("/docs/Latitude-PCF.PDF", "Download"),
            LinkScore::Jackpot
        );
        // A PDF without an indicator is scored normally
        assert!(matches!(
            score_of("/docs/brochure.pdf", "Brochure"),
            LinkScore::Points(_)
        ));
    }

    #[test]
    fn test_accumulated_points() {
        // strong (+10), category (+3), same host, under base (+2), fragment (+1)
        assert_eq!(
            score_of("/sustainability/pcf#laptops", "Laptop footprints"),
            LinkScore::Points(16)
        );
        // strong (+10), same host, not under base
        assert_eq!(
            score_of("/environment/reports", "Environmental reports"),
            LinkScore::Points(10)
        );
        // strong (+10), foreign host (-5)
        assert_eq!(
            score_of("https://reports.other.com/x", "Product carbon footprint"),
            LinkScore::Points(5)
        );
    }

    #[test]
    fn test_family_term_counts_as_category() {
        assert_eq!(score_of("/x", "MacBook"), LinkScore::Points(3));
    }

    fn page(html: &str) -> Page {
        Page::parse(html, &landing())
    }

    #[test]
    fn test_best_link_above_threshold() {
        let p = page(
            r#"<a href="/products">Products</a>
               <a href="/environment/pcf">Product Carbon Footprints</a>"#,
        );
        assert_eq!(
            scorer().best_link(&p).as_str(),
            "https://www.brand.com/environment/pcf"
        );
    }

    #[test]
    fn test_best_link_below_threshold_returns_base() {
        let p = page(r#"<a href="/laptops">Laptops</a><a href="/shop">Shop</a>"#);
        assert_eq!(scorer().best_link(&p), landing());
    }

    #[test]
    fn test_ties_keep_first_seen() {
        let p = page(
            r#"<a href="/env/a">Environmental A</a>
               <a href="/env/b">Environmental B</a>"#,
        );
        let best = scorer().best_candidate(&p).unwrap();
        assert_eq!(best.url.as_str(), "https://www.brand.com/env/a");
        assert_eq!(best.score, 10);
    }

    #[test]
    fn test_first_jackpot_wins() {
        let p = page(
            r#"<a href="/env">Environmental</a>
               <a href="/r/one-pcf.pdf">One</a>
               <a href="/r/two-pcf.pdf">Two</a>"#,
        );
        let best = scorer().best_candidate(&p).unwrap();
        assert_eq!(best.url.as_str(), "https://www.brand.com/r/one-pcf.pdf");
        assert_eq!(best.score, 999);
    }

    #[test]
    fn test_jackpot_beats_higher_points_with_tuned_weights() {
        let weights = ScoringWeights {
            jackpot_score: 12,
            ..ScoringWeights::default()
        };
        let mut config = crate::config::Config::default();
        config.scoring = weights.clone();
        assert!(crate::config::validate(&config).is_ok());

        let p = page(
            r#"<a href="/sustainability/pcf#laptops">Laptop footprints</a>
               <a href="/r/latitude.pdf">Laptop Carbon Footprint</a>"#,
        );
        let scorer = LinkScorer::new(weights);
        let best = scorer.best_candidate(&p).unwrap();
        assert!(best.is_jackpot());
        assert_eq!(best.score, 12);
        assert_eq!(
            scorer.best_link(&p).as_str(),
            "https://www.brand.com/r/latitude.pdf"
        );
    }

    #[test]
    fn test_excluded_pdf_never_selected() {
        assert_eq!(
            score_of("/support/carbon-footprint.pdf", "Product Carbon Footprint PCF"),
            LinkScore::Disqualified
        );

        let p = page(
            r#"<a href="/support/carbon-footprint.pdf">Product Carbon Footprint PCF</a>
               <a href="/laptops">Laptops</a>"#,
        );
        let best = scorer().best_candidate(&p).unwrap();
        assert_eq!(best.url.as_str(), "https://www.brand.com/laptops");
        assert_eq!(scorer().best_link(&p), landing());
    }

    #[test]
    fn test_only_disqualified_links() {
        let p = page(r#"<a href="/support">Support</a><a href="">Empty</a>"#);
        assert!(scorer().best_candidate(&p).is_none());
        assert_eq!(scorer().best_link(&p), landing());
    }
}

//! Row classification: which markup nodes look like one timetable row.
//!
//! The page's class names change between scrapes, so selection is a ranked
//! list of tiers and the first tier that matches anything wins.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// Row marker observed on tutu.ru station pages.
pub const DEFAULT_ROW_SIGNATURE: &str = "gBhE1wA30JAwoPLW";

/// Containers with this much text or less are never rows.
pub const MIN_CONTAINER_TEXT: usize = 10;

const GENERIC_SELECTORS: &[&str] = &[
    "div.schedule-item",
    "div.train-item",
    "tr.train-row",
    r#"div[class*="train"]"#,
    r#"div[class*="schedule"]"#,
    r#"tr[class*="train"]"#,
    "table tr",
];

const CONTAINER_SELECTOR: &str = "div, tr, li";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    RowSignature,
    GenericSelectors,
    ContainerScan,
}

/// Tried top to bottom.
pub const TIERS: &[Tier] = &[Tier::RowSignature, Tier::GenericSelectors, Tier::ContainerScan];

impl Tier {
    pub fn name(self) -> &'static str {
        match self {
            Tier::RowSignature => "row_signature",
            Tier::GenericSelectors => "generic_selectors",
            Tier::ContainerScan => "container_scan",
        }
    }
}

/// A node (or a bare text run) that may hold one timetable entry.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub text: String,
    pub node: Option<ElementRef<'a>>,
}

impl<'a> Candidate<'a> {
    pub fn from_node(node: ElementRef<'a>) -> Self {
        Candidate {
            text: node_text(node),
            node: Some(node),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Candidate {
            text: text.into(),
            node: None,
        }
    }
}

pub struct RowClassifier {
    row_signature: String,
}

impl RowClassifier {
    pub fn new(row_signature: impl Into<String>) -> Self {
        RowClassifier {
            row_signature: row_signature.into(),
        }
    }

    /// Candidates from the first tier that yields any, with the tier used.
    pub fn classify<'a>(&self, doc: &'a Html) -> Option<(Tier, Vec<Candidate<'a>>)> {
        TIERS.iter().find_map(|&tier| {
            let found = self.select_tier(tier, doc);
            if found.is_empty() {
                debug!(tier = tier.name(), "structural miss");
                None
            } else {
                info!(tier = tier.name(), nodes = found.len(), "row tier matched");
                Some((tier, found))
            }
        })
    }

    fn select_tier<'a>(&self, tier: Tier, doc: &'a Html) -> Vec<Candidate<'a>> {
        match tier {
            Tier::RowSignature => {
                let css = format!(r#"tr[class*="{}"]"#, self.row_signature);
                select_all(doc, &css)
                    .into_iter()
                    .map(Candidate::from_node)
                    .collect()
            }
            Tier::GenericSelectors => {
                let mut seen = HashSet::new();
                GENERIC_SELECTORS
                    .iter()
                    .flat_map(|css| select_all(doc, css))
                    .filter(|el| seen.insert(el.id()))
                    .map(Candidate::from_node)
                    .collect()
            }
            Tier::ContainerScan => tightest_first(select_all(doc, CONTAINER_SELECTOR)),
        }
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        RowClassifier::new(DEFAULT_ROW_SIGNATURE)
    }
}

/// All elements matching `css`; an unparsable selector matches nothing.
pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(e) => {
            warn!(selector = css, error = ?e, "unusable selector");
            Vec::new()
        }
    }
}

/// Containers with enough text, smallest text first.
///
/// A row is always shorter than the blocks wrapping it, so this order lets
/// the row itself claim an identity key before any ancestor does.
pub fn tightest_first(nodes: Vec<ElementRef<'_>>) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<(usize, Candidate<'_>)> = nodes
        .into_iter()
        .map(Candidate::from_node)
        .map(|c| (c.text.chars().count(), c))
        .filter(|(len, _)| *len > MIN_CONTAINER_TEXT)
        .collect();
    candidates.sort_by_key(|(len, _)| *len);
    candidates.into_iter().map(|(_, c)| c).collect()
}

/// Visible text of a node: trimmed text runs joined by single spaces,
/// skipping script and style content.
pub fn node_text(node: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for descendant in node.descendants() {
        let Some(text) = descendant.value().as_text() else {
            continue;
        };
        let hidden = descendant
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));
        if hidden {
            continue;
        }
        let t = text.trim();
        if !t.is_empty() {
            parts.push(t);
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(found: &[Candidate<'_>]) -> Vec<String> {
        found.iter().map(|c| c.text.clone()).collect()
    }

    #[test]
    fn signature_tier_wins() {
        let html = Html::parse_document(
            r#"<table>
                <tr class="x gBhE1wA30JAwoPLW"><td>Москва — Мытищи</td><td>05:30</td></tr>
                <tr class="train-row"><td>Москва — Пушкино</td><td>06:00</td></tr>
            </table>"#,
        );
        let (tier, found) = RowClassifier::default().classify(&html).unwrap();
        assert_eq!(tier, Tier::RowSignature);
        assert_eq!(texts(&found), ["Москва — Мытищи 05:30"]);
    }

    #[test]
    fn falls_back_to_generic_selectors() {
        let html = Html::parse_document(
            r#"<div class="train-item">Москва — Пушкино 06:00</div>
               <table><tr><td>Москва — Мытищи</td><td>05:30</td></tr></table>"#,
        );
        let (tier, found) = RowClassifier::default().classify(&html).unwrap();
        assert_eq!(tier, Tier::GenericSelectors);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn generic_selectors_do_not_repeat_nodes() {
        // matches div.train-item and div[class*="train"]
        let html = Html::parse_document(r#"<div class="train-item">Москва — Пушкино 06:00</div>"#);
        let (_, found) = RowClassifier::default().classify(&html).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn container_scan_orders_tightest_first() {
        let html = Html::parse_document(
            r#"<div id="outer"><ul>
                <li>Москва — Мытищи 05:30</li>
                <li>Москва — Пушкино 06:00 Будни</li>
               </ul></div>"#,
        );
        let (tier, found) = RowClassifier::default().classify(&html).unwrap();
        assert_eq!(tier, Tier::ContainerScan);
        assert_eq!(
            texts(&found),
            [
                "Москва — Мытищи 05:30",
                "Москва — Пушкино 06:00 Будни",
                "Москва — Мытищи 05:30 Москва — Пушкино 06:00 Будни",
            ]
        );
    }

    #[test]
    fn container_scan_skips_short_text() {
        let html = Html::parse_document("<div>abc</div>");
        assert!(RowClassifier::default().classify(&html).is_none());
    }

    #[test]
    fn bad_signature_is_a_structural_miss() {
        let html = Html::parse_document(r#"<div class="train-item">Москва — Пушкино 06:00</div>"#);
        let (tier, _) = RowClassifier::new(r#"bad"]["#).classify(&html).unwrap();
        assert_eq!(tier, Tier::GenericSelectors);
    }

    #[test]
    fn node_text_skips_scripts() {
        let html = Html::parse_document(
            "<div id=row><script>var t = '09:00';</script><b>Москва</b>\n — <i>Тверь</i></div>",
        );
        let row = select_all(&html, "#row")[0];
        assert_eq!(node_text(row), "Москва — Тверь");
    }
}

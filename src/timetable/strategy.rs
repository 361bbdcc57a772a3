//! Independent extraction strategies and their aggregation.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use tracing::{debug, info};

use super::builder::build_entry;
use super::classify::{node_text, select_all, tightest_first, Candidate, RowClassifier};
use super::entry::TimetableEntry;

static TEXT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Lu}[^—]{0,60}?—[^—]{1,60}?\s*\d{1,2}:\d{2}\s*(?:[Бб]удни|[Ее]жедневно|[Вв]ыходные)")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Row classifier tiers, first non-empty tier only.
    RankedRows,
    /// Every `div`/`tr` that carries a class attribute.
    ClassedContainers,
    /// Regex over the flattened page text.
    DocumentText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunWhen {
    Always,
    NothingFoundYet,
}

/// Run order. Later strategies only add keys the earlier ones missed.
pub const STRATEGIES: &[(Strategy, RunWhen)] = &[
    (Strategy::RankedRows, RunWhen::Always),
    (Strategy::ClassedContainers, RunWhen::Always),
    (Strategy::DocumentText, RunWhen::NothingFoundYet),
];

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::RankedRows => "ranked_rows",
            Strategy::ClassedContainers => "classed_containers",
            Strategy::DocumentText => "document_text",
        }
    }

    pub fn candidates<'a>(self, doc: &'a Html, classifier: &RowClassifier) -> Vec<Candidate<'a>> {
        match self {
            Strategy::RankedRows => classifier
                .classify(doc)
                .map(|(_, found)| found)
                .unwrap_or_default(),
            Strategy::ClassedContainers => tightest_first(select_all(doc, "div[class], tr[class]")),
            Strategy::DocumentText => {
                let text = node_text(doc.root_element());
                TEXT_RUN_RE
                    .find_iter(&text)
                    .map(|m| Candidate::from_text(m.as_str()))
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub strategy: Strategy,
    pub candidates: usize,
    pub entries: usize,
}

/// Run every applicable strategy and concatenate what they build, in
/// strategy order. Duplicates are expected; see `dedup`.
pub fn aggregate(doc: &Html, classifier: &RowClassifier) -> (Vec<TimetableEntry>, Vec<StrategyReport>) {
    let mut entries = Vec::new();
    let mut reports = Vec::new();

    for &(strategy, when) in STRATEGIES {
        if when == RunWhen::NothingFoundYet && !entries.is_empty() {
            debug!(strategy = strategy.name(), "skipped: earlier strategies succeeded");
            continue;
        }

        let candidates = strategy.candidates(doc, classifier);
        let built: Vec<TimetableEntry> = candidates.iter().filter_map(build_entry).collect();
        info!(
            strategy = strategy.name(),
            candidates = candidates.len(),
            entries = built.len(),
            "strategy finished"
        );

        reports.push(StrategyReport {
            strategy,
            candidates: candidates.len(),
            entries: built.len(),
        });
        entries.extend(built);
    }

    (entries, reports)
}

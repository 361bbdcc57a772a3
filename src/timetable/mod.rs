pub mod builder;
pub mod classify;
pub mod dedup;
pub mod entry;
pub mod fields;
pub mod normalize;
pub mod strategy;

use scraper::Html;
use tracing::debug;

use crate::error::TimetableError;
use classify::RowClassifier;
pub use entry::{DayPattern, TimetableEntry};
use strategy::StrategyReport;

pub struct ExtractOptions {
    pub row_signature: String,
    pub day_filter: Option<DayPattern>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            row_signature: classify::DEFAULT_ROW_SIGNATURE.to_string(),
            day_filter: None,
        }
    }
}

pub struct Extraction {
    /// Deduplicated, filtered, sorted.
    pub entries: Vec<TimetableEntry>,
    /// Unique entries before the day filter was applied.
    pub unique_before_filter: usize,
    pub reports: Vec<StrategyReport>,
}

/// Parse raw page text. Only input with no markup at all is refused;
/// html5ever recovers from everything else.
pub fn parse_document(raw: &str) -> Result<Html, TimetableError> {
    if raw.trim().is_empty() {
        return Err(TimetableError::MalformedDocument("document is empty".into()));
    }
    if !raw.contains('<') {
        return Err(TimetableError::MalformedDocument(
            "no markup found in document".into(),
        ));
    }
    let doc = Html::parse_document(raw);
    debug!(parse_errors = doc.errors.len(), "document parsed");
    Ok(doc)
}

/// Pipeline: html → candidates per strategy → entries → dedup → filter → sort.
pub fn extract_timetable(raw: &str, options: &ExtractOptions) -> Result<Extraction, TimetableError> {
    let doc = parse_document(raw)?;
    let classifier = RowClassifier::new(options.row_signature.as_str());

    let (entries, reports) = strategy::aggregate(&doc, &classifier);
    let unique = dedup::dedup(entries);
    let unique_before_filter = unique.len();

    let mut entries = dedup::filter_days(unique, options.day_filter);
    dedup::sort_by_departure(&mut entries);

    Ok(Extraction {
        entries,
        unique_before_filter,
        reports,
    })
}

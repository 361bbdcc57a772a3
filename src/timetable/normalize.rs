//! Ordered text cleanup used by the route fallback.
//!
//! Each step is a pure `&str -> String` function; [`clean_route_text`] folds
//! the text through [`ROUTE_CLEANUP`] in order.

use std::sync::LazyLock;

use regex::Regex;

use super::fields::DAY_KEYWORDS;

const VEHICLE_LABELS: &str = "Спутник|Электричка|Иволга|Ласточка|Экспресс|РЭКС";

static VEHICLE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*(?:{VEHICLE_LABELS})\b")).unwrap());
static VEHICLE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b(?:{VEHICLE_LABELS})\b")).unwrap());
static TRAIN_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,2}:\d{2}\b").unwrap());
/// Every keyword the day extractor knows, completed to the end of the word,
/// with an optional leading "кроме".
static DAY_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = DAY_KEYWORDS
        .iter()
        .flat_map(|(_, words)| words.iter())
        .map(|w| regex::escape(w))
        .collect();
    Regex::new(&format!(r"(?i)(?:\bкроме\s+)?\b(?:{})\w*", words.join("|"))).unwrap()
});
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub struct Step {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

pub const ROUTE_CLEANUP: &[Step] = &[
    Step { name: "strip_vehicle_label", apply: strip_vehicle_label },
    Step { name: "strip_train_numbers", apply: strip_train_numbers },
    Step { name: "strip_times", apply: strip_times },
    Step { name: "strip_day_keywords", apply: strip_day_keywords },
    Step { name: "collapse_whitespace", apply: collapse_whitespace },
];

pub fn clean_route_text(text: &str) -> String {
    ROUTE_CLEANUP.iter().fold(text.to_string(), |acc, step| {
        let next = (step.apply)(&acc);
        tracing::trace!(step = step.name, out = %next);
        next
    })
}

pub fn strip_vehicle_label(s: &str) -> String {
    VEHICLE_LABEL_RE.replace(s, "").into_owned()
}

pub fn strip_train_numbers(s: &str) -> String {
    TRAIN_NUMBER_RE.replace_all(s, "").into_owned()
}

pub fn strip_times(s: &str) -> String {
    TIME_RE.replace_all(s, "").into_owned()
}

pub fn strip_day_keywords(s: &str) -> String {
    DAY_KEYWORD_RE.replace_all(s, "").into_owned()
}

/// Replace vehicle labels and day keywords anywhere in the text with a `|`
/// barrier, so a run of capitalized words never absorbs them.
pub fn mask_route_noise(s: &str) -> String {
    let s = VEHICLE_WORD_RE.replace_all(s, "|");
    DAY_KEYWORD_RE.replace_all(&s, "|").into_owned()
}

pub fn collapse_whitespace(s: &str) -> String {
    WS_RE.replace_all(s, " ").trim().to_string()
}

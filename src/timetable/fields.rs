//! Single-field extractors. Each one is a pure `&str -> Option<_>`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::entry::{DayPattern, DepartureTime};
use super::normalize::{clean_route_text, mask_route_noise};

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,2}:\d{2}\b").unwrap());
static TIME_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{1,2}[:.]\d{2}\b").unwrap());
static NAMED_ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let name = r"\p{Lu}\p{Ll}+(?:-\p{L}\p{Ll}*)*";
    Regex::new(&format!(r"{name}(?:\s+{name})*\s*[—–]\s*{name}(?:\s+{name})*")).unwrap()
});

/// "кроме выходных" names the opposite pattern.
static EXCEPT_WEEKEND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"кроме\s+(?:выходн\w*|сб\s*[-–]\s*вс)").unwrap());

/// Above this the fallback residual is assumed to still carry noise.
pub const ROUTE_CEILING: usize = 50;

const WEEKDAY_KEYWORDS: &[&str] = &[
    "будни",
    "пн-пт",
    "пн–пт",
    "рабочие дни",
    "по рабочим",
    "понедельник-пятница",
    "workdays",
    "weekdays",
    "mon-fri",
    "mon–fri",
];
const DAILY_KEYWORDS: &[&str] = &["ежедневно", "ежедн", "кажд", "все дни", "daily", "every day"];
const WEEKEND_KEYWORDS: &[&str] = &[
    "выходн",
    "сб-вс",
    "сб–вс",
    "суббот",
    "воскресень",
    "weekend",
    "saturday",
    "sunday",
];

/// Checked in this order; the first hit wins. Entries are lowercase word
/// prefixes.
pub const DAY_KEYWORDS: &[(DayPattern, &[&str])] = &[
    (DayPattern::Weekdays, WEEKDAY_KEYWORDS),
    (DayPattern::Daily, DAILY_KEYWORDS),
    (DayPattern::Weekend, WEEKEND_KEYWORDS),
];

/// First `H:MM`/`HH:MM` in the text that is a real clock time.
pub fn extract_time(text: &str) -> Option<DepartureTime> {
    TIME_RE
        .find_iter(text)
        .find_map(|m| DepartureTime::parse(m.as_str()))
}

pub fn count_times(text: &str) -> usize {
    TIME_RE.find_iter(text).count()
}

/// Route as `Origin — Destination`.
///
/// Prefers an explicit pair of capitalized station names; otherwise falls
/// back to whatever is left after stripping known noise. `None` means the
/// route could not be determined.
pub fn extract_route(text: &str) -> Option<String> {
    let masked = mask_route_noise(text);
    if let Some(m) = NAMED_ROUTE_RE.find(&masked) {
        return Some(m.as_str().trim().to_string());
    }

    let residual = clean_route_text(text);
    let route = if residual.chars().count() > ROUTE_CEILING {
        truncate_residual(&residual)
    } else {
        residual
    };

    (!route.is_empty()).then_some(route)
}

/// Number of distinct `Origin — Destination` pairs; one row carries one.
pub fn count_named_routes(text: &str) -> usize {
    NAMED_ROUTE_RE.find_iter(&mask_route_noise(text)).count()
}

/// Cut an over-long residual at the first time-like token, or else keep only
/// the first `A — B` pair.
fn truncate_residual(residual: &str) -> String {
    if let Some(m) = TIME_LIKE_RE.find(residual) {
        let head = residual[..m.start()].trim();
        if !head.is_empty() {
            return head.to_string();
        }
    }

    let parts: Vec<&str> = residual.split('—').map(str::trim).collect();
    if parts.len() > 2 {
        return format!("{} — {}", parts[0], parts[1]);
    }
    residual.to_string()
}

/// Day pattern named explicitly in this text, if any.
pub fn explicit_days(text: &str) -> Option<DayPattern> {
    let lower = day_text(text);
    DAY_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(pattern, _)| *pattern)
}

/// Every day pattern mentioned anywhere in the text.
pub fn mentioned_days(text: &str) -> HashSet<DayPattern> {
    let lower = day_text(text);
    DAY_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(pattern, _)| *pattern)
        .collect()
}

/// Lowercased, with "кроме выходных" rewritten to the weekday keyword.
fn day_text(text: &str) -> String {
    let lower = text.to_lowercase();
    EXCEPT_WEEKEND_RE.replace_all(&lower, "будни").into_owned()
}

/// A context text is only trusted when it speaks for a single pattern.
pub fn unanimous_days(text: &str) -> Option<DayPattern> {
    let found = mentioned_days(text);
    if found.len() == 1 {
        found.into_iter().next()
    } else {
        None
    }
}

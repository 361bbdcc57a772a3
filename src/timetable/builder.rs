use scraper::ElementRef;
use tracing::debug;

use super::classify::{node_text, Candidate};
use super::entry::{DayPattern, DaySource, TimetableEntry};
use super::fields::{
    count_named_routes, count_times, explicit_days, extract_route, extract_time, unanimous_days,
};

pub const MIN_ROUTE_LEN: usize = 5;
pub const MAX_ROUTE_LEN: usize = 80;
/// Departure, arrival and travel time fit in one row; more means several rows.
pub const MAX_TIMES_PER_ROW: usize = 3;
/// How far up the tree a missing day marker is looked for.
pub const ANCESTOR_DEPTH: usize = 3;

pub const UNDETERMINED_ROUTE: &str = "Маршрут не определен";

/// Origin and destination must be separated by one of these.
const ROUTE_SEPARATORS: &[&str] = &["—", "–", " - "];

const HEADER_KEYWORDS: &[&str] = &[
    "Маршрут",
    "Отправление",
    "Дни следования",
    "Route",
    "Departure",
    "Days",
];

/// Turn one candidate into an entry, or drop it.
pub fn build_entry(candidate: &Candidate<'_>) -> Option<TimetableEntry> {
    let text = candidate.text.as_str();

    let Some(departure_time) = extract_time(text) else {
        debug!(text, "dropped: no departure time");
        return None;
    };

    if let Some(word) = HEADER_KEYWORDS.iter().find(|w| text.contains(*w)) {
        debug!(text, header = *word, "dropped: header row");
        return None;
    }

    let route = match extract_route(text) {
        Some(r) if r != UNDETERMINED_ROUTE && r.chars().count() >= MIN_ROUTE_LEN => r,
        _ => {
            debug!(text, "dropped: route undetermined");
            return None;
        }
    };

    if !ROUTE_SEPARATORS.iter().any(|sep| route.contains(sep)) {
        debug!(text, route = %route, "dropped: route has no origin/destination separator");
        return None;
    }

    if route.chars().count() > MAX_ROUTE_LEN {
        debug!(text, "dropped: route too long");
        return None;
    }

    let times = count_times(text);
    if times > MAX_TIMES_PER_ROW {
        debug!(times, "dropped: spans several rows");
        return None;
    }

    // A wrapper around a few rows: its day marker may belong to a sibling.
    let routes = count_named_routes(text);
    if routes > 1 {
        debug!(routes, "dropped: holds several routes");
        return None;
    }

    let (days, days_source) = resolve_days(candidate);

    Some(TimetableEntry {
        departure_time,
        route,
        days,
        days_source,
    })
}

/// Own marker first, then the nearest ancestor that mentions exactly one
/// pattern, then the default.
fn resolve_days(candidate: &Candidate<'_>) -> (DayPattern, DaySource) {
    if let Some(days) = explicit_days(&candidate.text) {
        return (days, DaySource::Explicit);
    }

    candidate
        .node
        .into_iter()
        .flat_map(|node| node.ancestors())
        .filter_map(ElementRef::wrap)
        .take(ANCESTOR_DEPTH)
        .find_map(|ancestor| unanimous_days(&node_text(ancestor)))
        .map(|days| (days, DaySource::Inherited))
        .unwrap_or((DayPattern::Daily, DaySource::Default))
}

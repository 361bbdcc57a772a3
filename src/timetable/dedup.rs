use std::collections::HashMap;

use tracing::debug;

use super::entry::{DayPattern, TimetableEntry};

/// Drop repeated `(departure_time, route)` keys, keeping the first
/// occurrence's position and text. A later duplicate only replaces `days`
/// when its day source is more confident.
pub fn dedup(entries: Vec<TimetableEntry>) -> Vec<TimetableEntry> {
    let mut index: HashMap<((u8, u8), String), usize> = HashMap::new();
    let mut out: Vec<TimetableEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let (clock, route) = entry.key();
        let key = (clock, route.to_string());
        match index.get(&key) {
            Some(&i) => {
                let kept = &mut out[i];
                if entry.days_source > kept.days_source {
                    debug!(
                        route = %kept.route,
                        from = %kept.days,
                        to = %entry.days,
                        "duplicate carried a better day pattern"
                    );
                    kept.days = entry.days;
                    kept.days_source = entry.days_source;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(entry);
            }
        }
    }

    out
}

pub fn filter_days(entries: Vec<TimetableEntry>, filter: Option<DayPattern>) -> Vec<TimetableEntry> {
    match filter {
        Some(days) => entries.into_iter().filter(|e| e.days == days).collect(),
        None => entries,
    }
}

/// Chronological by (hour, minute); stable for equal times.
pub fn sort_by_departure(entries: &mut [TimetableEntry]) {
    entries.sort_by(|a, b| a.departure_time.cmp(&b.departure_time));
}

/// Dedup, then filter, then sort.
pub fn finalize(entries: Vec<TimetableEntry>, filter: Option<DayPattern>) -> Vec<TimetableEntry> {
    let mut out = filter_days(dedup(entries), filter);
    sort_by_departure(&mut out);
    out
}

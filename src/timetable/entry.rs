use std::fmt;

use serde::{Deserialize, Serialize};

/// Service-day classification of a train run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DayPattern {
    #[default]
    #[value(alias = "ежедневно")]
    Daily,
    #[value(alias = "будни")]
    Weekdays,
    #[value(alias = "выходные")]
    Weekend,
}

impl DayPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            DayPattern::Daily => "daily",
            DayPattern::Weekdays => "weekdays",
            DayPattern::Weekend => "weekend",
        }
    }
}

impl fmt::Display for DayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entry's `days` value came from. Ordered by confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DaySource {
    #[default]
    Default,
    Inherited,
    Explicit,
}

/// A clock time as printed on the page (`5:30`, `05:30`).
///
/// The printed text is kept for output; equality, hashing and ordering use
/// the (hour, minute) value so `5:30` and `05:30` are the same departure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DepartureTime {
    text: String,
    hour: u8,
    minute: u8,
}

impl DepartureTime {
    /// Parse `H:MM` or `HH:MM`. Out-of-range clocks are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.split_once(':')?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hour: u8 = h.parse().ok()?;
        let minute: u8 = m.parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(DepartureTime {
            text: s.to_string(),
            hour,
            minute,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn clock(&self) -> (u8, u8) {
        (self.hour, self.minute)
    }
}

impl PartialEq for DepartureTime {
    fn eq(&self, other: &Self) -> bool {
        self.clock() == other.clock()
    }
}

impl Eq for DepartureTime {}

impl std::hash::Hash for DepartureTime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.clock().hash(state);
    }
}

impl PartialOrd for DepartureTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepartureTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.clock().cmp(&other.clock())
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<DepartureTime> for String {
    fn from(t: DepartureTime) -> String {
        t.text
    }
}

impl TryFrom<String> for DepartureTime {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DepartureTime::parse(&s).ok_or_else(|| format!("not a HH:MM departure time: {s:?}"))
    }
}

/// One timetable row. Serialized field order is the output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub departure_time: DepartureTime,
    pub route: String,
    pub days: DayPattern,
    #[serde(skip)]
    pub days_source: DaySource,
}

impl TimetableEntry {
    /// Identity used for deduplication; `days` is deliberately not part of it.
    pub fn key(&self) -> ((u8, u8), &str) {
        (self.departure_time.clock(), self.route.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_padded_and_unpadded() {
        let a = DepartureTime::parse("5:30").unwrap();
        let b = DepartureTime::parse("05:30").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "5:30");
        assert_eq!(b.clock(), (5, 30));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(DepartureTime::parse("24:00").is_none());
        assert!(DepartureTime::parse("12:60").is_none());
        assert!(DepartureTime::parse("123:00").is_none());
        assert!(DepartureTime::parse("1:5").is_none());
        assert!(DepartureTime::parse("ab:cd").is_none());
    }

    #[test]
    fn orders_numerically() {
        let early = DepartureTime::parse("5:30").unwrap();
        let late = DepartureTime::parse("22:45").unwrap();
        assert!(early < late);
        // plain string comparison would get this backwards
        assert!("5:30" > "22:45");
    }

    #[test]
    fn serializes_in_field_order() {
        let entry = TimetableEntry {
            departure_time: DepartureTime::parse("05:30").unwrap(),
            route: "Москва — Мытищи".into(),
            days: DayPattern::Weekdays,
            days_source: DaySource::Explicit,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"departure_time":"05:30","route":"Москва — Мытищи","days":"weekdays"}"#
        );
    }

    #[test]
    fn deserialize_rejects_bad_time() {
        let bad = r#"{"departure_time":"99:99","route":"Москва — Мытищи","days":"daily"}"#;
        assert!(serde_json::from_str::<TimetableEntry>(bad).is_err());
    }

    #[test]
    fn day_source_confidence_order() {
        assert!(DaySource::Explicit > DaySource::Inherited);
        assert!(DaySource::Inherited > DaySource::Default);
    }
}

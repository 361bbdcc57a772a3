//! On-disk artifacts: the cached station page and the JSON timetable.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::info;

use crate::error::TimetableError;
use crate::timetable::TimetableEntry;

pub fn load_document(path: &Path) -> Result<String, TimetableError> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            info!(path = %path.display(), bytes = raw.len(), "loaded cached page");
            Ok(raw)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(TimetableError::DocumentMissing {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(TimetableError::MalformedDocument(
            format!("{} is not valid UTF-8", path.display()),
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn save_document(path: &Path, raw: &str) -> Result<(), TimetableError> {
    ensure_parent(path)?;
    fs::write(path, raw)?;
    info!(path = %path.display(), bytes = raw.len(), "cached page saved");
    Ok(())
}

/// Pretty-printed JSON array; field order follows `TimetableEntry`.
pub fn save_entries(path: &Path, entries: &[TimetableEntry]) -> Result<(), TimetableError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json)?;
    info!(path = %path.display(), entries = entries.len(), "timetable saved");
    Ok(())
}

pub fn load_entries(path: &Path) -> Result<Vec<TimetableEntry>, TimetableError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(TimetableError::OutputMissing {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

fn ensure_parent(path: &Path) -> Result<(), TimetableError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::entry::{DayPattern, DaySource, DepartureTime};

    fn sample() -> Vec<TimetableEntry> {
        vec![TimetableEntry {
            departure_time: DepartureTime::parse("05:30").unwrap(),
            route: "Москва Ярославская — Сергиев Посад".into(),
            days: DayPattern::Weekdays,
            days_source: DaySource::Explicit,
        }]
    }

    #[test]
    fn missing_document_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("schedule.html")).unwrap_err();
        assert!(matches!(err, TimetableError::DocumentMissing { .. }));
        assert!(err.to_string().contains("run `fetch` first"));
    }

    #[test]
    fn non_utf8_document_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.html");
        fs::write(&path, [0xff, 0xfe, 0x3c, 0x00]).unwrap();
        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, TimetableError::MalformedDocument(_)));
    }

    #[test]
    fn document_roundtrip_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache/schedule.html");
        save_document(&path, "<p>ok</p>").unwrap();
        assert_eq!(load_document(&path).unwrap(), "<p>ok</p>");
    }

    #[test]
    fn json_is_pretty_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        save_entries(&path, &sample()).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let expected = r#"[
  {
    "departure_time": "05:30",
    "route": "Москва Ярославская — Сергиев Посад",
    "days": "weekdays"
  }
]"#;
        assert_eq!(written, expected);
    }

    #[test]
    fn empty_result_still_writes_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");
        save_entries(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(load_entries(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_output_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_entries(&dir.path().join("schedule.json")).unwrap_err();
        assert!(matches!(err, TimetableError::OutputMissing { .. }));
    }
}

use std::path::PathBuf;

/// Pipeline-wide failures. Per-candidate problems never surface here.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// The cached station page has not been downloaded yet
    #[error("timetable page not found at {}; run `fetch` first", .path.display())]
    DocumentMissing { path: PathBuf },

    /// Saved JSON output is absent
    #[error("no saved timetable at {}; run `parse` first", .path.display())]
    OutputMissing { path: PathBuf },

    /// Input cannot be treated as HTML at all
    #[error("not a usable HTML document: {0}")]
    MalformedDocument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

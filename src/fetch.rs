use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::info;

use crate::error::TimetableError;
use crate::settings::Settings;
use crate::store;

/// Result of one page download.
pub struct FetchedPage {
    pub body: String,
    pub path: PathBuf,
    pub status: u16,
    pub latency_ms: u64,
}

/// Download the station page and cache it at `settings.html_path`.
/// Any non-2xx status is an error; there is no retry.
pub fn fetch_station_page(settings: &Settings) -> Result<FetchedPage, TimetableError> {
    let url = settings.station_url();
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;

    info!(%url, "downloading station page");
    let t0 = Instant::now();
    let response = client.get(&url).send()?.error_for_status()?;
    let status = response.status().as_u16();
    let body = response.text()?;
    let latency_ms = t0.elapsed().as_millis() as u64;
    info!(status, bytes = body.len(), latency_ms, "station page downloaded");

    store::save_document(&settings.html_path, &body)?;

    Ok(FetchedPage {
        body,
        path: settings.html_path.clone(),
        status,
        latency_ms,
    })
}

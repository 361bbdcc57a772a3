use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::TimetableError;
use crate::timetable::classify::DEFAULT_ROW_SIGNATURE;

const DEFAULT_STATION_ID: i64 = 45807;
const DEFAULT_BASE_URL: &str = "https://www.tutu.ru/station.php";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_TIMEOUT_SECS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub station_id: u32,
    pub base_url: String,
    pub html_path: PathBuf,
    pub json_path: PathBuf,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub row_signature: String,
}

impl Settings {
    /// Defaults, then `timetable.toml` if present, then `TIMETABLE_*` env vars.
    pub fn load() -> Result<Self, TimetableError> {
        let builder = defaults()?
            .add_source(File::with_name("timetable").required(false))
            .add_source(Environment::with_prefix("TIMETABLE"));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, TimetableError> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// CLI flags beat every other layer.
    pub fn override_with(
        &mut self,
        html: Option<PathBuf>,
        json: Option<PathBuf>,
        station: Option<u32>,
    ) {
        if let Some(p) = html {
            self.html_path = p;
        }
        if let Some(p) = json {
            self.json_path = p;
        }
        if let Some(id) = station {
            self.station_id = id;
        }
    }

    pub fn station_url(&self) -> String {
        format!("{}?nnst={}", self.base_url, self.station_id)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, TimetableError> {
    Ok(Config::builder()
        .set_default("station_id", DEFAULT_STATION_ID)?
        .set_default("base_url", DEFAULT_BASE_URL)?
        .set_default("html_path", "schedule.html")?
        .set_default("json_path", "schedule.json")?
        .set_default("user_agent", DEFAULT_USER_AGENT)?
        .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
        .set_default("row_signature", DEFAULT_ROW_SIGNATURE)?)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_only() {
        let s = Settings::from_builder(defaults().unwrap()).unwrap();
        assert_eq!(s.station_id, 45807);
        assert_eq!(s.html_path, PathBuf::from("schedule.html"));
        assert_eq!(s.json_path, PathBuf::from("schedule.json"));
        assert_eq!(s.timeout_secs, 30);
        assert_eq!(s.row_signature, DEFAULT_ROW_SIGNATURE);
        assert!(s.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(s.station_url(), "https://www.tutu.ru/station.php?nnst=45807");
    }

    #[test]
    fn file_layer_overrides_defaults() {
        let toml = "station_id = 2000\nrow_signature = \"newRowClass\"\n";
        let builder = defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));
        let s = Settings::from_builder(builder).unwrap();
        assert_eq!(s.station_id, 2000);
        assert_eq!(s.row_signature, "newRowClass");
        assert_eq!(s.html_path, PathBuf::from("schedule.html"));
    }

    #[test]
    fn cli_flags_win() {
        let mut s = Settings::from_builder(defaults().unwrap()).unwrap();
        s.override_with(Some("page.html".into()), None, Some(9601));
        assert_eq!(s.html_path, PathBuf::from("page.html"));
        assert_eq!(s.json_path, PathBuf::from("schedule.json"));
        assert_eq!(s.station_url(), "https://www.tutu.ru/station.php?nnst=9601");
    }
}

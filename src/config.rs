//! Application configuration.
//!
//! Read from an optional JSON file; every field has a default and unknown
//! fields are rejected. Command-line flags override the file.
//!
//! ```json
//! {
//!   "dataFile": "portfolio.json",
//!   "loadingTimeoutMs": 15000,
//!   "startRoute": "/posts"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hooks::LOADING_TIMEOUT;
use crate::router::Route;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Realtime-database export to serve from.
    pub data_file: Option<PathBuf>,
    /// How long hooks wait for a first snapshot.
    pub loading_timeout_ms: u64,
    /// Event loop tick.
    pub tick_ms: u64,
    /// How often the data file is checked for changes.
    pub reload_interval_ms: u64,
    pub start_route: String,
    /// Where logs go. Logging is off without one.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            loading_timeout_ms: LOADING_TIMEOUT.as_millis() as u64,
            tick_ms: 16,
            reload_interval_ms: 1000,
            start_route: "/".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn loading_timeout(&self) -> Duration {
        Duration::from_millis(self.loading_timeout_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_millis(self.reload_interval_ms)
    }

    pub fn start_route(&self) -> Result<Route> {
        self.start_route.parse()
    }

    pub fn data_path(&self) -> Result<&Path> {
        self.data_file.as_deref().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no data file configured (use --data or FOLIO_DATA)",
            ))
        })
    }

    /// Check everything that can be checked before the terminal is taken.
    pub fn validate(&self) -> Result<()> {
        self.start_route()?;
        self.data_path()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.loading_timeout(), Duration::from_secs(15));
        assert_eq!(config.tick(), Duration::from_millis(16));
        assert_eq!(config.start_route().unwrap(), Route::Home);
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"dataFile": "site.json", "loadingTimeoutMs": 500, "startRoute": "/posts"}}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("site.json")));
        assert_eq!(config.loading_timeout(), Duration::from_millis(500));
        assert_eq!(config.start_route().unwrap(), Route::Posts);
        assert_eq!(config.reload_interval_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dataFiel": "typo.json"}}"#).unwrap();
        assert!(matches!(Config::load(file.path()), Err(Error::Json(_))));
    }

    #[test]
    fn test_validate() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            data_file: Some("x.json".into()),
            start_route: "/nowhere".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidRoute(_))));
    }
}

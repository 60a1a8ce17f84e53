use crate::source::DataSource;
use std::{env, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_SOURCE: &str = "data";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Directory path or `http(s)://` base URL holding `manifest.json`.
    pub data_source: String,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Reads `PORT`, `DIARY_DATA_SOURCE` and `DIARY_FETCH_TIMEOUT_SECS`;
    /// unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            data_source: lookup("DIARY_DATA_SOURCE")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.data_source),
            fetch_timeout: lookup("DIARY_FETCH_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
        }
    }

    pub fn data_source(&self) -> Result<DataSource, Box<dyn std::error::Error>> {
        DataSource::from_location(&self.data_source, self.fetch_timeout)
    }
}

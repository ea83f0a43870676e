use std::{env, path::PathBuf, time::Duration};

use chrono::Weekday;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Appointment sub-rows per week (default: 4)
    pub row_capacity: usize,
    /// Upper bound for fetching one month, in seconds (default: 30)
    pub fetch_timeout_seconds: u64,
    /// First day of the week in the grid (default: Sunday)
    pub week_start: Weekday,
    /// JSON event store; the demo calendars are used when unset.
    pub events_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRAYCAL_ROW_CAPACITY` - Sub-rows per week (default: 4)
    /// - `TRAYCAL_FETCH_TIMEOUT_SECONDS` - Month fetch timeout (default: 30)
    /// - `TRAYCAL_WEEK_START` - `sunday` or `monday` (default: `sunday`)
    /// - `TRAYCAL_EVENTS_FILE` - Path to a JSON event store (default: unset)
    pub fn from_env() -> Self {
        Self {
            row_capacity: env::var("TRAYCAL_ROW_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            fetch_timeout_seconds: env::var("TRAYCAL_FETCH_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            week_start: env::var("TRAYCAL_WEEK_START")
                .ok()
                .and_then(|v| parse_week_start(&v))
                .unwrap_or(Weekday::Sun),
            events_file: env::var("TRAYCAL_EVENTS_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Get the fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Parses a week start day. Only Sunday and Monday are supported.
pub fn parse_week_start(value: &str) -> Option<Weekday> {
    match value.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        _ => None,
    }
}

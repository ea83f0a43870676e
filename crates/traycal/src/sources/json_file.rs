//! Local appointment store kept in a JSON file.
//!
//! ```json
//! {
//!   "calendars": [
//!     {
//!       "id": "work",
//!       "name": "Work",
//!       "color": "#3B82F6",
//!       "events": [
//!         { "subject": "Standup", "start": "2024-05-06T09:00:00", "end": "2024-05-06T09:15:00" },
//!         { "subject": "Offsite", "start": "2024-05-13T00:00:00", "end": "2024-05-15T00:00:00", "all_day": true }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! All-day events use an exclusive `end` at midnight after the last day.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use url::Url;

use traycal_core::calendar::{CalendarMeta, RawEvent, Rgb};
use traycal_core::serde::{deserialize_optional_string, deserialize_optional_url};
use traycal_core::source::{CalendarSource, Result, SourceError};

#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(default)]
    calendars: Vec<StoredCalendar>,
}

#[derive(Debug, Deserialize)]
struct StoredCalendar {
    id: String,
    name: String,
    color: Rgb,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    events: Vec<StoredEvent>,
}

#[derive(Debug, Deserialize)]
struct StoredEvent {
    subject: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    description: Option<String>,
    start: NaiveDateTime,
    end: NaiveDateTime,
    #[serde(default)]
    all_day: bool,
    #[serde(default, deserialize_with = "deserialize_optional_url")]
    link: Option<Url>,
    #[serde(default)]
    cancelled: bool,
}

impl StoredEvent {
    fn into_raw(self) -> RawEvent {
        let mut duration = (self.end - self.start).max(Duration::zero());
        if self.all_day && duration > Duration::zero() {
            duration = duration - Duration::seconds(1);
        }
        RawEvent {
            subject: self.subject,
            description: self.description,
            start: self.start,
            duration,
            all_day: self.all_day,
            link: self.link,
            cancelled: self.cancelled,
        }
    }
}

/// Reads calendars and events from a JSON file.
///
/// The file is re-read on every request, so edits show up after the cache
/// is cleared.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreFile> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&contents).map_err(|err| {
            SourceError::Provider(format!("invalid store {}: {}", self.path.display(), err))
        })
    }
}

#[async_trait]
impl CalendarSource for JsonFileSource {
    async fn setup(&self) -> Result<()> {
        let store = self.load().await?;
        tracing::debug!(
            path = %self.path.display(),
            calendars = store.calendars.len(),
            "Event store loaded"
        );
        Ok(())
    }

    async fn list_calendars(&self) -> Result<Vec<CalendarMeta>> {
        let store = self.load().await?;
        Ok(store
            .calendars
            .into_iter()
            .map(|c| CalendarMeta::new(c.id, c.name, c.color).with_hidden(c.hidden))
            .collect())
    }

    async fn list_events(
        &self,
        calendar: &CalendarMeta,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawEvent>> {
        let store = self.load().await?;
        let Some(stored) = store.calendars.into_iter().find(|c| c.id == calendar.id) else {
            tracing::warn!(calendar_id = %calendar.id, "Calendar missing from event store");
            return Ok(Vec::new());
        };

        Ok(stored
            .events
            .into_iter()
            .map(StoredEvent::into_raw)
            .filter(|e| e.start < end && e.start + e.duration >= start)
            .collect())
    }
}

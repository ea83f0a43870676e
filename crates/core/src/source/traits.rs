use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::calendar::{CalendarMeta, RawEvent};

use super::Result;

/// A provider of calendars and their events.
///
/// Implementations perform their own I/O; callers treat any error as a
/// failed fetch for the period being requested.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Prepares the provider (credentials, store handles). Called once before use.
    async fn setup(&self) -> Result<()> {
        Ok(())
    }

    /// Lists every calendar the provider exposes.
    async fn list_calendars(&self) -> Result<Vec<CalendarMeta>>;

    /// Lists the events of `calendar` that overlap `[start, end)`.
    async fn list_events(
        &self,
        calendar: &CalendarMeta,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawEvent>>;
}

use async_trait::async_trait;
use chrono::NaiveDateTime;

use traycal_core::calendar::{demo_calendars, generate_seed_events, CalendarMeta, MonthKey, RawEvent};
use traycal_core::source::{CalendarSource, Result};

/// Serves generated demo calendars; useful without any event store configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl DemoSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CalendarSource for DemoSource {
    async fn list_calendars(&self) -> Result<Vec<CalendarMeta>> {
        Ok(demo_calendars())
    }

    async fn list_events(
        &self,
        calendar: &CalendarMeta,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawEvent>> {
        // Seed events of the previous month can run into the requested window.
        let first = MonthKey::of(start).pred();
        let months = MonthKey::covering(first.start(), end);

        Ok(months
            .into_iter()
            .flat_map(|month| generate_seed_events(&calendar.id, month))
            .filter(|event| event.start < end && event.start + event.duration >= start)
            .collect())
    }
}

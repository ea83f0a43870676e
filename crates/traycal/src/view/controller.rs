use chrono::{NaiveDate, NaiveDateTime, Weekday};

use traycal_core::calendar::{drop_cancelled, GridRange, MonthKey};

use crate::cache::EventCache;

use super::grid::MonthGrid;

/// Navigation state of the month display, backed by an [`EventCache`].
///
/// `refresh` only reads the cache; call it again when the cache reports an
/// update to pick up newly fetched months.
#[derive(Debug, Clone)]
pub struct MonthView {
    cache: EventCache,
    month: MonthKey,
    today: NaiveDate,
    week_start: Weekday,
    row_capacity: usize,
}

impl MonthView {
    /// Starts on the month containing `today`.
    pub fn new(cache: EventCache, today: NaiveDate, week_start: Weekday, row_capacity: usize) -> Self {
        Self {
            cache,
            month: MonthKey::containing(today),
            today,
            week_start,
            row_capacity,
        }
    }

    /// Shows `month` instead of the current month.
    pub fn with_month(mut self, month: MonthKey) -> Self {
        self.month = month;
        self
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn cache(&self) -> &EventCache {
        &self.cache
    }

    /// The visible day range for the current month.
    pub fn range(&self) -> GridRange {
        GridRange::for_month(self.month, self.week_start)
    }

    pub fn next_month(&mut self) -> MonthGrid {
        self.month = self.month.succ();
        self.refresh()
    }

    pub fn prev_month(&mut self) -> MonthGrid {
        self.month = self.month.pred();
        self.refresh()
    }

    /// Jumps back to the month containing today.
    pub fn current_month(&mut self) -> MonthGrid {
        self.month = MonthKey::containing(self.today);
        self.refresh()
    }

    /// Builds the grid from whatever the cache holds right now.
    pub fn refresh(&self) -> MonthGrid {
        let range = self.range();
        let events = self
            .cache
            .get_events_in_range(range.start_instant(), range.last_instant());
        MonthGrid::build(
            self.month,
            range,
            self.row_capacity,
            &drop_cancelled(events),
            self.today,
        )
    }

    /// Drops all cached events and rebuilds the grid.
    pub async fn reload(&mut self) -> MonthGrid {
        self.cache.clear_cache().await;
        self.refresh()
    }

    /// Advances the clock. When the day changes the cache is cleared and the
    /// rebuilt grid is returned.
    pub async fn tick(&mut self, now: NaiveDateTime) -> Option<MonthGrid> {
        if now.date() == self.today {
            return None;
        }
        tracing::info!(today = %now.date(), "Day changed, reloading events");
        self.today = now.date();
        Some(self.reload().await)
    }
}

use std::sync::Arc;

use traycal_core::calendar::Event;

/// Fetch state of a month bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthStatus {
    /// Known but not fetched, either new or after a failed fetch.
    #[default]
    Empty,
    /// Exactly one fetch for the month is in flight.
    Pending,
    /// Fetched; never fetched again until the cache is cleared.
    Ready,
}

/// A month bucket. Replaced as a whole value, never edited in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct MonthEntry {
    pub(crate) status: MonthStatus,
    pub(crate) events: Arc<[Event]>,
}

impl MonthEntry {
    pub(crate) fn ready(events: Vec<Event>) -> Self {
        Self {
            status: MonthStatus::Ready,
            events: events.into(),
        }
    }
}

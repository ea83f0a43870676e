use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDateTime;

use super::types::Event;

/// Subject prefix some meeting tools give to cancelled invitations.
pub const CANCELLED_PREFIX: &str = "Canceled: ";

/// Keeps the events that touch the inclusive window `[start, end]`.
pub fn filter_events_by_range(
    events: impl IntoIterator<Item = Event>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| event.overlaps(start, end))
        .collect()
}

/// Removes exact duplicates, keeping the first occurrence.
///
/// Providers return an event for every month query it overlaps, so events
/// crossing a month boundary come back once per month bucket.
pub fn dedup_events(events: Vec<Event>) -> Vec<Event> {
    let mut seen = HashSet::with_capacity(events.len());
    events
        .into_iter()
        .filter(|event| seen.insert(event.clone()))
        .collect()
}

/// Drops events whose subject marks them as cancelled.
pub fn drop_cancelled(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|event| !event.subject.starts_with(CANCELLED_PREFIX))
        .collect()
}

/// Layout order: earlier start first, longer event first on equal start.
pub fn layout_order(a: &Event, b: &Event) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.duration.cmp(&a.duration))
}

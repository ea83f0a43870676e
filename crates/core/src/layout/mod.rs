//! Month grid layout.
//!
//! Packs events into a fixed number of sub-rows per week. Every event takes
//! the lowest sub-row that is free on all of its days (first-fit), events that
//! cross a week boundary are split into one placement per week, and events
//! that find no free sub-row are left out.

mod occupancy;

use serde::Serialize;

use crate::calendar::{layout_order, Event, GridRange};

use occupancy::Occupancy;

const DAYS_PER_WEEK: usize = 7;

/// One bar segment of an event inside a single week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement<'a> {
    pub event: &'a Event,
    /// Week row of the grid, starting at 0 for the week containing `range.begin`.
    pub week_row: usize,
    /// Day column within the week, 0 to 6.
    pub day_column: usize,
    /// Number of columns covered, at least 1 and never past the end of the week.
    pub column_span: usize,
    /// Vertical slot within the week's appointment area.
    pub sub_row: usize,
}

impl Placement<'_> {
    /// Columns covered by this placement, `day_column..day_column + column_span`.
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.day_column..self.day_column + self.column_span
    }
}

/// Counts describing a layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    /// Events overlapping the visible range.
    pub visible: usize,
    /// Events that received a sub-row.
    pub placed: usize,
    /// Visible events left out because every sub-row was taken.
    pub dropped: usize,
}

/// Placements together with the counts of the pass that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthLayout<'a> {
    pub placements: Vec<Placement<'a>>,
    pub stats: LayoutStats,
}

/// Lays out `events` on `range` with `row_capacity` sub-rows per week.
///
/// Output is deterministic for a given input and never fails; events that do
/// not fit are omitted.
pub fn layout<'a>(events: &'a [Event], range: &GridRange, row_capacity: usize) -> Vec<Placement<'a>> {
    layout_with_stats(events, range, row_capacity).placements
}

/// Same as [`layout`], also reporting how many events were dropped.
pub fn layout_with_stats<'a>(
    events: &'a [Event],
    range: &GridRange,
    row_capacity: usize,
) -> MonthLayout<'a> {
    let total_days = range.total_days();
    if total_days == 0 {
        return MonthLayout::default();
    }

    let window_start = range.start_instant();
    let window_end = range.last_instant();
    let mut visible: Vec<&Event> = events
        .iter()
        .filter(|event| event.overlaps(window_start, window_end))
        .collect();
    visible.sort_by(|a, b| layout_order(a, b));

    // First-fit never needs more sub-rows than there are events.
    let row_capacity = row_capacity.min(visible.len());
    let mut occupancy = Occupancy::new(total_days, row_capacity);
    let mut result = MonthLayout {
        placements: Vec::with_capacity(visible.len()),
        stats: LayoutStats {
            visible: visible.len(),
            ..LayoutStats::default()
        },
    };

    for event in visible {
        let first_day = event.first_day().clamp(range.begin, range.end);
        let last_day = event.last_day().clamp(first_day, range.end);
        let column = (first_day - range.begin).num_days() as usize;
        let width = ((last_day - first_day).num_days() as usize + 1).min(total_days - column);
        let days = column..column + width;

        let Some(sub_row) = occupancy.first_free(days.clone()) else {
            result.stats.dropped += 1;
            continue;
        };
        occupancy.occupy(days.clone(), sub_row);
        result.stats.placed += 1;
        push_week_segments(&mut result.placements, event, days, sub_row);
    }

    result
}

/// Splits `days` (absolute day columns) at week boundaries.
fn push_week_segments<'a>(
    placements: &mut Vec<Placement<'a>>,
    event: &'a Event,
    days: std::ops::Range<usize>,
    sub_row: usize,
) {
    let mut day = days.start;
    while day < days.end {
        let day_column = day % DAYS_PER_WEEK;
        let column_span = (DAYS_PER_WEEK - day_column).min(days.end - day);
        placements.push(Placement {
            event,
            week_row: day / DAYS_PER_WEEK,
            day_column,
            column_span,
            sub_row,
        });
        day += column_span;
    }
}

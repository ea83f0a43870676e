//! Owned rendering model for one month.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use traycal_core::calendar::{tooltip_text, Event, GridRange, MonthKey, Rgb};
use traycal_core::layout::{layout_with_stats, LayoutStats};

/// One day square of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// False for the leading and trailing days of neighbouring months.
    pub in_month: bool,
    pub today: bool,
}

/// An event bar segment inside one week row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub subject: String,
    pub tooltip: String,
    pub link: Option<String>,
    pub all_day: bool,
    pub color: Rgb,
    pub text_color: Rgb,
    pub week_row: usize,
    pub day_column: usize,
    pub column_span: usize,
    pub sub_row: usize,
}

/// Everything needed to draw a month: day cells, bars and layout counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: MonthKey,
    pub range: GridRange,
    pub row_capacity: usize,
    pub days: Vec<DayCell>,
    pub bars: Vec<Bar>,
    pub stats: LayoutStats,
}

impl MonthGrid {
    /// Lays out `events` on the grid of `range` and resolves display texts.
    pub fn build(
        month: MonthKey,
        range: GridRange,
        row_capacity: usize,
        events: &[Event],
        today: NaiveDate,
    ) -> Self {
        let days = range
            .days()
            .map(|date| DayCell {
                date,
                in_month: date.year() == month.year() && date.month() == month.month(),
                today: date == today,
            })
            .collect();

        let layout = layout_with_stats(events, &range, row_capacity);
        if layout.stats.dropped > 0 {
            tracing::debug!(
                month = %month,
                dropped = layout.stats.dropped,
                "Events left out of full week rows"
            );
        }

        let bars = layout
            .placements
            .iter()
            .map(|placement| Bar {
                subject: placement.event.subject.clone(),
                tooltip: tooltip_text(placement.event, today),
                link: placement.event.link.as_ref().map(|link| link.to_string()),
                all_day: placement.event.all_day,
                color: placement.event.color,
                text_color: placement.event.color.contrast_text(),
                week_row: placement.week_row,
                day_column: placement.day_column,
                column_span: placement.column_span,
                sub_row: placement.sub_row,
            })
            .collect();

        Self {
            month,
            range,
            row_capacity,
            days,
            bars,
            stats: layout.stats,
        }
    }

    pub fn week_count(&self) -> usize {
        self.range.week_count()
    }

    /// Day cells of week row `week`.
    pub fn week(&self, week: usize) -> &[DayCell] {
        let start = (week * 7).min(self.days.len());
        let end = (start + 7).min(self.days.len());
        &self.days[start..end]
    }

    /// Bars of week row `week` in sub-row `sub_row`, left to right.
    pub fn bars_in(&self, week: usize, sub_row: usize) -> Vec<&Bar> {
        let mut bars: Vec<&Bar> = self
            .bars
            .iter()
            .filter(|bar| bar.week_row == week && bar.sub_row == sub_row)
            .collect();
        bars.sort_by_key(|bar| bar.day_column);
        bars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn may_grid(events: &[Event], row_capacity: usize) -> MonthGrid {
        let may = MonthKey::new(2024, 5).unwrap();
        MonthGrid::build(
            may,
            GridRange::for_month(may, Weekday::Sun),
            row_capacity,
            events,
            date(5, 15),
        )
    }

    #[test]
    fn test_day_cells() {
        let grid = may_grid(&[], 4);

        assert_eq!(grid.days.len(), 35);
        assert_eq!(grid.week_count(), 5);
        assert_eq!(grid.days[0].date, date(4, 28));
        assert!(!grid.days[0].in_month);
        assert!(grid.days[3].in_month);
        assert!(!grid.days[34].in_month);
        let today: Vec<_> = grid.days.iter().filter(|d| d.today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, date(5, 15));
    }

    #[test]
    fn test_bar_texts_and_colors() {
        let dark = Rgb::new(0x1E, 0x3A, 0x8A);
        let light = Rgb::new(0xFD, 0xE6, 0x8A);
        let events = vec![
            Event::timed("Standup", date(5, 6).and_hms_opt(9, 0, 0).unwrap(), Duration::minutes(15))
                .with_color(dark),
            Event::all_day("Holiday", date(5, 27), date(5, 27)).with_color(light),
        ];

        let grid = may_grid(&events, 4);

        assert_eq!(grid.bars.len(), 2);
        let standup = &grid.bars[0];
        assert_eq!(standup.tooltip, "Standup\n05/06 9:00 - 05/06 9:15");
        assert_eq!(standup.text_color, Rgb::WHITE);
        let holiday = &grid.bars[1];
        assert_eq!(holiday.tooltip, "Holiday");
        assert_eq!(holiday.text_color, Rgb::BLACK);
        assert_eq!((holiday.week_row, holiday.day_column), (4, 1));
    }

    #[test]
    fn test_bars_in_week_row() {
        let events = vec![
            Event::timed("Late", date(5, 9).and_hms_opt(15, 0, 0).unwrap(), Duration::hours(1)),
            Event::timed("Early", date(5, 6).and_hms_opt(9, 0, 0).unwrap(), Duration::hours(1)),
        ];

        let grid = may_grid(&events, 4);
        let subjects: Vec<_> = grid.bars_in(1, 0).iter().map(|b| b.subject.as_str()).collect();

        assert_eq!(subjects, vec!["Early", "Late"]);
        assert!(grid.bars_in(2, 0).is_empty());
    }

    #[test]
    fn test_stats_report_dropped_events() {
        let start = date(5, 6).and_hms_opt(9, 0, 0).unwrap();
        let events = vec![
            Event::timed("A", start, Duration::hours(1)),
            Event::timed("B", start, Duration::hours(1)),
        ];

        let grid = may_grid(&events, 1);

        assert_eq!(grid.bars.len(), 1);
        assert_eq!(grid.stats.dropped, 1);
    }
}

//! Plain-text month grid.

use super::grid::{Bar, DayCell, MonthGrid};

const CELL_WIDTH: usize = 10;

/// Renders `grid` as text: a title, the weekday header, then for each week
/// a line of day numbers followed by one line per appointment sub-row.
///
/// Days of neighbouring months are shown in brackets, today is starred.
pub fn render_text(grid: &MonthGrid) -> String {
    let mut lines = vec![grid.month.first_day().format("%B %Y").to_string()];

    lines.push(
        grid.week(0)
            .iter()
            .map(|cell| pad(&cell.date.format("%a").to_string(), CELL_WIDTH))
            .collect::<String>()
            .trim_end()
            .to_string(),
    );

    for week in 0..grid.week_count() {
        lines.push(
            grid.week(week)
                .iter()
                .map(|cell| pad(&day_label(cell), CELL_WIDTH))
                .collect::<String>()
                .trim_end()
                .to_string(),
        );
        for sub_row in 0..grid.row_capacity {
            let bars = grid.bars_in(week, sub_row);
            if !bars.is_empty() {
                lines.push(bar_line(&bars));
            }
        }
    }

    lines.join("\n")
}

fn day_label(cell: &DayCell) -> String {
    let day = cell.date.format("%-d").to_string();
    match (cell.in_month, cell.today) {
        (true, true) => format!("{}*", day),
        (true, false) => day,
        (false, true) => format!("[{}]*", day),
        (false, false) => format!("[{}]", day),
    }
}

fn bar_line(bars: &[&Bar]) -> String {
    let mut line = vec![' '; 7 * CELL_WIDTH];
    for bar in bars {
        let start = bar.day_column * CELL_WIDTH;
        // Leave the last column of the span blank so neighbouring bars stay apart.
        let width = bar.column_span * CELL_WIDTH - 1;
        let mut text = bar.subject.chars().take(width);
        for slot in line.iter_mut().skip(start).take(width) {
            *slot = text.next().unwrap_or('.');
        }
    }
    line.into_iter().collect::<String>().trim_end().to_string()
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Weekday};
    use traycal_core::calendar::{Event, GridRange, MonthKey};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn render(events: &[Event]) -> Vec<String> {
        let may = MonthKey::new(2024, 5).unwrap();
        let grid = MonthGrid::build(
            may,
            GridRange::for_month(may, Weekday::Sun),
            2,
            events,
            date(5, 15),
        );
        render_text(&grid).lines().map(str::to_string).collect()
    }

    #[test]
    fn test_header_and_day_labels() {
        let lines = render(&[]);

        assert_eq!(lines[0], "May 2024");
        assert!(lines[1].starts_with("Sun       Mon       Tue"));
        assert!(lines[2].starts_with("[28]      [29]      [30]      1 "));
        assert!(lines[4].contains("15*"));
        assert!(lines[6].ends_with("[1]"));
        // Title, header and five weeks without bars.
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_bars_follow_their_week() {
        let events = vec![Event::all_day("Offsite", date(5, 6), date(5, 8))];

        let lines = render(&events);

        assert_eq!(lines[3].split_whitespace().next(), Some("5"));
        let bar = &lines[4];
        assert_eq!(bar.find("Offsite"), Some(CELL_WIDTH));
        assert_eq!(bar.len(), CELL_WIDTH + 3 * CELL_WIDTH - 1);
        assert!(bar.ends_with("..."));
    }

    #[test]
    fn test_long_subject_is_truncated_to_span() {
        let start = date(5, 1).and_hms_opt(9, 0, 0).unwrap();
        let events = vec![Event::timed(
            "A very long meeting title",
            start,
            Duration::hours(1),
        )];

        let lines = render(&events);

        assert_eq!(lines[3].trim(), "A very lo");
    }
}

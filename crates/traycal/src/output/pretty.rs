//! Pretty output formatting.

use traycal_core::calendar::CalendarMeta;

use crate::view::{render_text, MonthGrid};

/// Format a calendar for display.
pub fn format_calendar(calendar: &CalendarMeta) -> String {
    let mut output = format!(
        "{} ({})\n  ID: {}",
        calendar.name, calendar.display_color, calendar.id
    );
    if calendar.hidden {
        output.push_str("\n  Hidden");
    }
    output
}

/// Format calendars for display.
pub fn format_calendars(calendars: &[CalendarMeta]) -> String {
    if calendars.is_empty() {
        return "No calendars found.".to_string();
    }
    let mut output = format!("CALENDARS ({})\n", calendars.len());
    output.push_str(&"-".repeat(40));
    for calendar in calendars {
        output.push_str(&format!("\n{}", format_calendar(calendar)));
        output.push('\n');
    }
    output
}

/// Format a month grid, noting events that did not fit.
pub fn format_grid(grid: &MonthGrid) -> String {
    let mut output = render_text(grid);
    if grid.stats.dropped > 0 {
        output.push_str(&format!(
            "\n({} of {} events not shown)",
            grid.stats.dropped, grid.stats.visible
        ));
    }
    output
}

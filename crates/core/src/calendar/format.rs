use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::types::Event;

/// Formats an instant relative to `today`: the year is shown only when it
/// differs, the time only for timed events.
pub fn format_event_time(instant: NaiveDateTime, all_day: bool, today: NaiveDate) -> String {
    let mut text = if instant.year() != today.year() {
        instant.format("%Y/%m/%d").to_string()
    } else {
        instant.format("%m/%d").to_string()
    };
    if !all_day {
        text.push_str(&instant.format(" %-H:%M").to_string());
    }
    text
}

/// Hover text for an event bar: the subject, followed by the time span unless
/// the event is a single all-day entry.
pub fn tooltip_text(event: &Event, today: NaiveDate) -> String {
    let single_all_day = event.all_day && event.first_day() == event.last_day();
    if single_all_day {
        return event.subject.clone();
    }
    format!(
        "{}\n{} - {}",
        event.subject,
        format_event_time(event.start, event.all_day, today),
        format_event_time(event.end(), event.all_day, today)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_format_event_time_same_year() {
        let instant = make_date(2024, 5, 6).and_hms_opt(9, 5, 0).unwrap();
        assert_eq!(
            format_event_time(instant, false, make_date(2024, 1, 1)),
            "05/06 9:05"
        );
        assert_eq!(format_event_time(instant, true, make_date(2024, 1, 1)), "05/06");
    }

    #[test]
    fn test_format_event_time_other_year() {
        let instant = make_date(2025, 1, 2).and_hms_opt(14, 30, 0).unwrap();
        assert_eq!(
            format_event_time(instant, false, make_date(2024, 12, 31)),
            "2025/01/02 14:30"
        );
    }

    #[test]
    fn test_tooltip_text_timed() {
        let event = Event::timed(
            "Review",
            make_date(2024, 5, 6).and_hms_opt(9, 0, 0).unwrap(),
            Duration::minutes(90),
        );
        assert_eq!(
            tooltip_text(&event, make_date(2024, 5, 1)),
            "Review\n05/06 9:00 - 05/06 10:30"
        );
    }

    #[test]
    fn test_tooltip_text_single_all_day() {
        let day = make_date(2024, 5, 6);
        let event = Event::all_day("Holiday", day, day);
        assert_eq!(tooltip_text(&event, day), "Holiday");
    }

    #[test]
    fn test_tooltip_text_multi_day_all_day() {
        let event = Event::all_day("Trip", make_date(2024, 5, 6), make_date(2024, 5, 8));
        assert_eq!(
            tooltip_text(&event, make_date(2024, 5, 1)),
            "Trip\n05/06 - 05/08"
        );
    }
}

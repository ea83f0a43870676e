//! Mock data generation for demos and tests.
//!
//! Pure functions: the same month always yields the same calendars and events.

use chrono::{Duration, NaiveTime};

use super::month::MonthKey;
use super::types::{CalendarMeta, RawEvent, Rgb};

/// Calendars offered by the demo provider.
pub fn demo_calendars() -> Vec<CalendarMeta> {
    vec![
        CalendarMeta::new("work", "Work", Rgb::new(0x3B, 0x82, 0xF6)),
        CalendarMeta::new("personal", "Personal", Rgb::new(0x10, 0xB9, 0x81)),
        CalendarMeta::new("holidays", "Holidays", Rgb::new(0xF5, 0x9E, 0x0B)),
    ]
}

/// Generate seed events for one demo calendar within `month`.
///
/// # Example
///
/// ```
/// use traycal_core::calendar::{generate_seed_events, MonthKey};
///
/// let month = MonthKey::new(2024, 6).unwrap();
/// let events = generate_seed_events("work", month);
///
/// assert!(!events.is_empty());
/// assert!(events.iter().all(|e| e.start >= month.start() && e.start < month.end()));
/// ```
pub fn generate_seed_events(calendar_id: &str, month: MonthKey) -> Vec<RawEvent> {
    let first = month.first_day();
    let last = month.last_day();
    let days = (last - first).num_days() + 1;
    let time = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN);

    match calendar_id {
        "work" => {
            let timed_titles = [
                ("Standup Meeting", 9, 30, 15),
                ("Product Review", 11, 0, 60),
                ("Sprint Planning", 14, 0, 120),
                ("Code Review", 16, 0, 45),
                ("1:1 Meeting", 10, 0, 30),
            ];
            let mut events: Vec<RawEvent> = (0..days)
                .step_by(3)
                .enumerate()
                .map(|(i, offset)| {
                    let (title, h, m, minutes) = timed_titles[i % timed_titles.len()];
                    let date = first + Duration::days(offset);
                    RawEvent::timed(title, date.and_time(time(h, m)), Duration::minutes(minutes))
                })
                .collect();
            let conference = first + Duration::days(12);
            events.push(
                RawEvent::all_day("Conference", conference, conference + Duration::days(3))
                    .with_description("Annual engineering conference"),
            );
            events.push(
                RawEvent::timed(
                    "Canceled: Budget Sync",
                    (first + Duration::days(7)).and_time(time(15, 0)),
                    Duration::minutes(30),
                ),
            );
            events
        }
        "personal" => {
            let titles = ["Gym Session", "Lunch with Team", "Doctor Appointment", "Coffee"];
            let mut events: Vec<RawEvent> = (1..days)
                .step_by(5)
                .enumerate()
                .map(|(i, offset)| {
                    let date = first + Duration::days(offset);
                    RawEvent::timed(
                        titles[i % titles.len()],
                        date.and_time(time(12 + (i as u32 % 6), 0)),
                        Duration::hours(1),
                    )
                })
                .collect();
            let trip_start = last - Duration::days(1);
            events.push(RawEvent::all_day(
                "Weekend Trip",
                trip_start,
                trip_start + Duration::days(3),
            ));
            events
        }
        "holidays" => vec![
            RawEvent::all_day("Public Holiday", first, first),
            RawEvent::all_day("Release Day", first + Duration::days(20), first + Duration::days(20)),
        ],
        _ => Vec::new(),
    }
}

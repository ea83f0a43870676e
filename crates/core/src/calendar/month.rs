use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::error::CalendarError;

/// Identity of a calendar month, the unit of caching and fetching.
///
/// Stored as the first day of the month so two keys for the same month are
/// always equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Returns `None` when `month` is not in `1..=12` or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    /// The month containing `instant`.
    pub fn of(instant: NaiveDateTime) -> Self {
        Self::containing(instant.date())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.succ().0 - Duration::days(1)
    }

    /// First instant of the month.
    pub fn start(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// First instant of the following month (exclusive end).
    pub fn end(&self) -> NaiveDateTime {
        self.succ().start()
    }

    pub fn succ(&self) -> Self {
        Self(self.0 + Months::new(1))
    }

    pub fn pred(&self) -> Self {
        Self(self.0 - Months::new(1))
    }

    /// Every month touched by the inclusive window `[start, end]`, in order.
    pub fn covering(start: NaiveDateTime, end: NaiveDateTime) -> Vec<MonthKey> {
        let last = MonthKey::of(end);
        let mut months = Vec::new();
        let mut current = MonthKey::of(start);
        while current <= last {
            months.push(current);
            current = current.succ();
        }
        months
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = CalendarError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).ok_or_else(invalid)
    }
}

/// The visible days of a month grid, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl GridRange {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    /// The week-aligned range showing `month`, with weeks starting on `week_start`.
    pub fn for_month(month: MonthKey, week_start: Weekday) -> Self {
        let first = month.first_day();
        let last = month.last_day();
        let lead = days_from(week_start, first.weekday());
        let trail = 6 - days_from(week_start, last.weekday());
        Self {
            begin: first - Duration::days(lead),
            end: last + Duration::days(trail),
        }
    }

    /// Number of visible days; zero when `end` precedes `begin`.
    pub fn total_days(&self) -> usize {
        if self.end < self.begin {
            0
        } else {
            ((self.end - self.begin).num_days() + 1) as usize
        }
    }

    /// Number of 7-day rows needed to show the range.
    pub fn week_count(&self) -> usize {
        self.total_days().div_ceil(7)
    }

    /// First instant of `begin`.
    pub fn start_instant(&self) -> NaiveDateTime {
        self.begin.and_time(NaiveTime::MIN)
    }

    /// Last representable instant of `end`.
    pub fn last_instant(&self) -> NaiveDateTime {
        (self.end + Duration::days(1)).and_time(NaiveTime::MIN) - Duration::nanoseconds(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date <= self.end
    }

    /// Every visible day, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.total_days() as i64).map(move |offset| self.begin + Duration::days(offset))
    }
}

fn days_from(week_start: Weekday, day: Weekday) -> i64 {
    let start = i64::from(week_start.num_days_from_monday());
    let day = i64::from(day.num_days_from_monday());
    (day - start).rem_euclid(7)
}

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::CalendarError;

/// An opaque RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self, CalendarError> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CalendarError::InvalidColor(value.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| CalendarError::InvalidColor(value.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Perceived brightness on a 0-255 scale.
    pub fn luminance(&self) -> u32 {
        (u32::from(self.r) * 299 + u32::from(self.g) * 587 + u32::from(self.b) * 114) / 1000
    }

    /// Text color that stays readable on top of this color.
    pub fn contrast_text(&self) -> Rgb {
        if self.luminance() < 128 {
            Rgb::WHITE
        } else {
            Rgb::BLACK
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// A calendar as listed by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMeta {
    pub id: String,
    pub name: String,
    /// Color every event of this calendar is drawn with.
    pub display_color: Rgb,
    #[serde(default)]
    pub hidden: bool,
}

impl CalendarMeta {
    pub fn new(id: impl Into<String>, name: impl Into<String>, display_color: Rgb) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            display_color,
            hidden: false,
        }
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// An event exactly as a provider hands it over, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub subject: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    pub duration: Duration,
    pub all_day: bool,
    pub link: Option<Url>,
    /// Cancelled meetings are reported by some stores and never displayed.
    pub cancelled: bool,
}

impl RawEvent {
    /// Creates a timed event.
    pub fn timed(subject: impl Into<String>, start: NaiveDateTime, duration: Duration) -> Self {
        Self {
            subject: subject.into(),
            description: None,
            start,
            duration: duration.max(Duration::zero()),
            all_day: false,
            link: None,
            cancelled: false,
        }
    }

    /// Creates an all-day event covering `first..=last`.
    ///
    /// The duration stops one second short of the following midnight so the
    /// event never reaches into the next day.
    pub fn all_day(subject: impl Into<String>, first: NaiveDate, last: NaiveDate) -> Self {
        let days = (last - first).num_days().max(0) + 1;
        Self {
            subject: subject.into(),
            description: None,
            start: first.and_time(NaiveTime::MIN),
            duration: Duration::days(days) - Duration::seconds(1),
            all_day: true,
            link: None,
            cancelled: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: Url) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = cancelled;
        self
    }
}

/// A normalized event held by the cache.
///
/// `start` is a local wall-clock instant; `color` comes from the owning
/// calendar at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub subject: String,
    pub description: Option<String>,
    pub start: NaiveDateTime,
    #[serde(with = "crate::serde::duration_seconds")]
    pub duration: Duration,
    pub all_day: bool,
    pub link: Option<Url>,
    pub color: Rgb,
}

impl Event {
    /// Normalizes a provider event, inheriting the calendar's color.
    pub fn from_raw(raw: RawEvent, calendar: &CalendarMeta) -> Self {
        Self {
            subject: raw.subject,
            description: raw.description,
            start: raw.start,
            duration: raw.duration.max(Duration::zero()),
            all_day: raw.all_day,
            link: raw.link,
            color: calendar.display_color,
        }
    }

    /// Creates a timed event drawn in black.
    pub fn timed(subject: impl Into<String>, start: NaiveDateTime, duration: Duration) -> Self {
        Self::from_raw(
            RawEvent::timed(subject, start, duration),
            &CalendarMeta::new("", "", Rgb::BLACK),
        )
    }

    /// Creates an all-day event covering `first..=last` drawn in black.
    pub fn all_day(subject: impl Into<String>, first: NaiveDate, last: NaiveDate) -> Self {
        Self::from_raw(
            RawEvent::all_day(subject, first, last),
            &CalendarMeta::new("", "", Rgb::BLACK),
        )
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// The instant the event ends (exclusive).
    pub fn end(&self) -> NaiveDateTime {
        self.start + self.duration
    }

    /// The day the event starts on.
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// The last day the event occupies.
    ///
    /// An event ending exactly at midnight does not occupy the following day,
    /// and a zero-length event occupies its start day.
    pub fn last_day(&self) -> NaiveDate {
        let last = (self.end() - Duration::nanoseconds(1)).date();
        last.max(self.first_day())
    }

    /// Returns true if the event touches the inclusive window `[start, end]`.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start <= end && self.end() >= start
    }
}

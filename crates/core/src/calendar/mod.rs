mod error;
mod format;
mod mock_data;
mod month;
mod operations;
mod types;

pub use error::CalendarError;
pub use format::{format_event_time, tooltip_text};
pub use mock_data::{demo_calendars, generate_seed_events};
pub use month::{GridRange, MonthKey};
pub use operations::{
    dedup_events, drop_cancelled, filter_events_by_range, layout_order, CANCELLED_PREFIX,
};
pub use types::{CalendarMeta, Event, RawEvent, Rgb};

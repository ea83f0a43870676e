//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;

use traycal_core::calendar::CalendarMeta;

use crate::cli::OutputFormat;
use crate::view::MonthGrid;

/// A command result that can be printed in every [`OutputFormat`].
pub trait Render: Serialize {
    /// Human-readable form.
    fn pretty(&self) -> String;
}

impl Render for MonthGrid {
    fn pretty(&self) -> String {
        pretty::format_grid(self)
    }
}

impl Render for Vec<CalendarMeta> {
    fn pretty(&self) -> String {
        pretty::format_calendars(self)
    }
}

/// Format a command result for output.
pub fn format_output<T: Render>(value: &T, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => Ok(value.pretty()),
    }
}

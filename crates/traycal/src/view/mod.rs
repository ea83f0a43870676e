//! Month display: navigation state, rendering model and text output.

mod controller;
mod grid;
mod render;

pub use controller::MonthView;
pub use grid::{Bar, DayCell, MonthGrid};
pub use render::render_text;

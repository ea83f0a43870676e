//! Core of the traycal month calendar.
//!
//! This crate is free of I/O and runtime concerns:
//! - `calendar` holds the data model (calendars, events, months, grid ranges)
//! - `source` defines the contract calendar providers implement
//! - `layout` packs events into the rows of a month grid

pub mod calendar;
pub mod layout;
pub mod serde;
pub mod source;

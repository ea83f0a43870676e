//! traycal - month calendar with a per-month event cache and packed
//! appointment bars.

pub mod cache;
pub mod cli;
pub mod config;
pub mod output;
pub mod sources;
pub mod view;

pub use cache::{CacheError, CacheUpdate, EventCache, EventCacheConfig, MonthStatus};
pub use config::Config;
pub use view::{MonthGrid, MonthView};

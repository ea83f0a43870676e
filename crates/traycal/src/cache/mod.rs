//! Month-bucketed event cache with background fetches.

mod entry;
mod error;
mod event_cache;
mod pubsub;

pub use entry::MonthStatus;
pub use error::{CacheError, Result};
pub use event_cache::{EventCache, EventCacheConfig, DEFAULT_FETCH_TIMEOUT};
pub use pubsub::CacheUpdate;

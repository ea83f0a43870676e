//! Per-month event cache.
//!
//! Reads never wait: a query returns whatever is cached and, for months that
//! have not been fetched yet, spawns a background fetch and returns early.
//! Each completed fetch publishes a [`CacheUpdate`] so consumers can re-query.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, Mutex as TokioMutex};
use tokio::task::JoinHandle;

use traycal_core::calendar::{
    dedup_events, filter_events_by_range, CalendarMeta, Event, MonthKey,
};
use traycal_core::source::CalendarSource;

use super::entry::{MonthEntry, MonthStatus};
use super::pubsub::{CacheUpdate, UpdateNotifier};
use super::{CacheError, Result};

/// Default upper bound for fetching one month.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for [`EventCache`].
#[derive(Debug, Clone)]
pub struct EventCacheConfig {
    /// Upper bound for one month fetch, calendar list included.
    pub fetch_timeout: Duration,
}

impl Default for EventCacheConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Month buckets plus the generation they belong to.
///
/// The generation is bumped on every clear; a fetch only writes back if the
/// generation it was started in is still current.
#[derive(Debug, Default)]
struct MonthTable {
    generation: u64,
    entries: HashMap<MonthKey, MonthEntry>,
}

struct Inner {
    source: Arc<dyn CalendarSource>,
    runtime: Handle,
    config: EventCacheConfig,
    months: Mutex<MonthTable>,
    /// Calendar-list gate: held while the list is looked up or fetched.
    calendars: TokioMutex<Option<Arc<Vec<CalendarMeta>>>>,
    fetches: Mutex<Vec<JoinHandle<()>>>,
    notifier: UpdateNotifier,
}

/// Lazily filled, month-bucketed cache of events from one calendar source.
///
/// Cloning is cheap; all clones share the same cache.
#[derive(Clone)]
pub struct EventCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for EventCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCache")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl EventCache {
    /// Creates a cache whose fetches run on the current tokio runtime.
    pub fn new(source: Arc<dyn CalendarSource>, config: EventCacheConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;
        Ok(Self::with_runtime(source, config, runtime))
    }

    /// Creates a cache whose fetches run on `runtime`.
    pub fn with_runtime(
        source: Arc<dyn CalendarSource>,
        config: EventCacheConfig,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                runtime,
                config,
                months: Mutex::new(MonthTable::default()),
                calendars: TokioMutex::new(None),
                fetches: Mutex::new(Vec::new()),
                notifier: UpdateNotifier::new(),
            }),
        }
    }

    /// Returns the cached events of `month`, starting a fetch if needed.
    ///
    /// The first call for a month returns an empty list and spawns exactly one
    /// fetch; calls made while that fetch is running spawn nothing.
    pub fn get_events_in_month(&self, month: MonthKey) -> Vec<Event> {
        let mut table = lock(&self.inner.months);
        let generation = table.generation;
        let entry = table.entries.entry(month).or_default();
        let events = entry.events.to_vec();

        if entry.status == MonthStatus::Empty {
            entry.status = MonthStatus::Pending;
            // Spawned under the table lock so `clear_cache` always sees the handle.
            self.spawn_sync(month, generation);
        }

        events
    }

    /// Returns the cached events touching the inclusive window `[start, end]`.
    ///
    /// May be partial while fetches for the covered months are outstanding.
    pub fn get_events_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        let events: Vec<Event> = MonthKey::covering(start, end)
            .into_iter()
            .flat_map(|month| self.get_events_in_month(month))
            .collect();
        dedup_events(filter_events_by_range(events, start, end))
    }

    /// Fetch state of `month`, or `None` if it was never requested.
    pub fn status(&self, month: MonthKey) -> Option<MonthStatus> {
        lock(&self.inner.months)
            .entries
            .get(&month)
            .map(|entry| entry.status)
    }

    /// Waits for every fetch in flight, then drops all cached data.
    pub async fn clear_cache(&self) {
        self.wait_idle().await;

        // Gate first: a fetch of the new generation must not see the old list.
        let mut calendars = self.inner.calendars.lock().await;
        *calendars = None;
        {
            let mut table = lock(&self.inner.months);
            table.generation += 1;
            table.entries.clear();
        }
        drop(calendars);

        tracing::debug!("Event cache cleared");
    }

    /// Waits until no fetch is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let fetches = std::mem::take(&mut *lock(&self.inner.fetches));
            if fetches.is_empty() {
                return;
            }
            for fetch in fetches {
                if let Err(err) = fetch.await {
                    tracing::error!(error = %err, "Month fetch task panicked");
                }
            }
        }
    }

    /// Receives one [`CacheUpdate`] per completed fetch.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheUpdate> {
        self.inner.notifier.subscribe()
    }

    /// Calls `callback` after every completed fetch.
    ///
    /// The callback runs on a single task, never concurrently with itself.
    /// Abort the returned handle to unregister it.
    pub fn on_update<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        self.inner.notifier.on_update(&self.inner.runtime, callback)
    }

    fn spawn_sync(&self, month: MonthKey, generation: u64) {
        let cache = self.clone();
        let fetch = self
            .inner
            .runtime
            .spawn(async move { cache.sync_month(month, generation).await });

        let mut fetches = lock(&self.inner.fetches);
        fetches.retain(|fetch| !fetch.is_finished());
        fetches.push(fetch);
    }

    async fn sync_month(&self, month: MonthKey, generation: u64) {
        tracing::debug!(month = %month, "Fetching month");
        let timeout = self.inner.config.fetch_timeout;
        let result = match tokio::time::timeout(timeout, self.fetch_month(month)).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(timeout.as_secs())),
        };

        let mut table = lock(&self.inner.months);
        if table.generation != generation {
            tracing::debug!(month = %month, "Discarding fetch started before cache clear");
            return;
        }

        match result {
            Ok(events) => {
                tracing::info!(month = %month, count = events.len(), "Month fetched");
                table.entries.insert(month, MonthEntry::ready(events));
                drop(table);
                self.inner.notifier.publish(CacheUpdate { month });
            }
            Err(err) => {
                tracing::warn!(month = %month, error = %err, "Month fetch failed");
                if let Some(entry) = table.entries.get_mut(&month) {
                    entry.status = MonthStatus::Empty;
                }
            }
        }
    }

    async fn fetch_month(&self, month: MonthKey) -> Result<Vec<Event>> {
        let calendars = self.calendars().await?;
        let mut events = Vec::new();

        for calendar in calendars.iter() {
            let raw = self
                .inner
                .source
                .list_events(calendar, month.start(), month.end())
                .await?;
            tracing::trace!(
                month = %month,
                calendar_id = %calendar.id,
                count = raw.len(),
                "Calendar events received"
            );
            events.extend(
                raw.into_iter()
                    .filter(|event| !event.cancelled)
                    .map(|event| Event::from_raw(event, calendar)),
            );
        }

        Ok(events)
    }

    /// Returns the calendar list, fetching it once per cache lifetime.
    async fn calendars(&self) -> Result<Arc<Vec<CalendarMeta>>> {
        let mut gate = self.inner.calendars.lock().await;
        if let Some(calendars) = gate.as_ref() {
            return Ok(calendars.clone());
        }

        let calendars = Arc::new(self.inner.source.list_calendars().await?);
        tracing::debug!(count = calendars.len(), "Calendar list fetched");
        *gate = Some(calendars.clone());
        Ok(calendars)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use traycal_core::calendar::{RawEvent, Rgb};
    use traycal_core::source::SourceError;

    use crate::sources::InMemorySource;

    fn may() -> MonthKey {
        MonthKey::new(2024, 5).unwrap()
    }

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn work() -> CalendarMeta {
        CalendarMeta::new("work", "Work", Rgb::new(0x3B, 0x82, 0xF6))
    }

    fn home() -> CalendarMeta {
        CalendarMeta::new("home", "Home", Rgb::new(0x10, 0xB9, 0x81))
    }

    async fn seeded_source() -> InMemorySource {
        let source = InMemorySource::new();
        source
            .add_calendar(
                work(),
                vec![
                    RawEvent::timed("Standup", at(5, 6, 9), ChronoDuration::minutes(15)),
                    RawEvent::timed("Review", at(6, 3, 14), ChronoDuration::hours(1)),
                    RawEvent::timed("Dropped", at(5, 7, 10), ChronoDuration::hours(1))
                        .with_cancelled(true),
                ],
            )
            .await;
        source
            .add_calendar(
                home(),
                vec![RawEvent::all_day(
                    "Trip",
                    NaiveDate::from_ymd_opt(2024, 5, 30).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
                )],
            )
            .await;
        source
    }

    fn cache_for(source: &InMemorySource) -> EventCache {
        EventCache::new(Arc::new(source.clone()), EventCacheConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_first_call_is_empty_and_fetches_once() {
        let source = seeded_source().await;
        source.hold();
        let cache = cache_for(&source);

        assert!(cache.get_events_in_month(may()).is_empty());
        assert_eq!(cache.status(may()), Some(MonthStatus::Pending));
        assert!(cache.get_events_in_month(may()).is_empty());

        source.release();
        cache.wait_idle().await;

        // One list_events call per calendar, for a single fetch.
        assert_eq!(source.calendar_requests(), 1);
        assert_eq!(source.event_requests(), 2);
        assert_eq!(cache.status(may()), Some(MonthStatus::Ready));
    }

    #[tokio::test]
    async fn test_ready_month_is_served_from_cache() {
        let source = seeded_source().await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.wait_idle().await;
        let events = cache.get_events_in_month(may());
        cache.wait_idle().await;

        let mut subjects: Vec<_> = events.iter().map(|e| e.subject.clone()).collect();
        subjects.sort();
        assert_eq!(subjects, vec!["Standup", "Trip"]);
        assert_eq!(source.event_requests(), 2);
    }

    #[tokio::test]
    async fn test_events_inherit_calendar_color() {
        let source = seeded_source().await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.wait_idle().await;

        for event in cache.get_events_in_month(may()) {
            let expected = if event.subject == "Trip" { home() } else { work() };
            assert_eq!(event.color, expected.display_color);
        }
    }

    #[tokio::test]
    async fn test_notifies_once_per_fetch() {
        let source = seeded_source().await;
        let cache = cache_for(&source);
        let mut updates = cache.subscribe();

        cache.get_events_in_month(may());
        cache.get_events_in_month(may());
        cache.wait_idle().await;

        assert_eq!(updates.recv().await.unwrap(), CacheUpdate { month: may() });
        assert!(matches!(
            updates.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_months_share_calendar_list() {
        let source = seeded_source().await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may().pred());
        cache.get_events_in_month(may());
        cache.get_events_in_month(may().succ());
        cache.wait_idle().await;

        assert_eq!(source.calendar_requests(), 1);
        assert_eq!(source.event_requests(), 6);
    }

    #[tokio::test]
    async fn test_range_spans_months_without_duplicates() {
        let source = seeded_source().await;
        let cache = cache_for(&source);
        let (start, end) = (at(5, 26, 0), at(6, 8, 0));

        assert!(cache.get_events_in_range(start, end).is_empty());
        cache.wait_idle().await;
        let events = cache.get_events_in_range(start, end);

        let mut subjects: Vec<_> = events.iter().map(|e| e.subject.clone()).collect();
        subjects.sort();
        // "Trip" is returned by both month fetches but appears once.
        assert_eq!(subjects, vec!["Review", "Trip"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retryable() {
        let source = seeded_source().await;
        source
            .fail_events(Some(SourceError::Provider("unavailable".to_string())))
            .await;
        let cache = cache_for(&source);
        let mut updates = cache.subscribe();

        cache.get_events_in_month(may());
        cache.wait_idle().await;
        assert_eq!(cache.status(may()), Some(MonthStatus::Empty));
        assert!(matches!(
            updates.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));

        source.fail_events(None).await;
        assert!(cache.get_events_in_month(may()).is_empty());
        cache.wait_idle().await;

        assert_eq!(cache.status(may()), Some(MonthStatus::Ready));
        assert_eq!(cache.get_events_in_month(may()).len(), 2);
        assert_eq!(updates.recv().await.unwrap(), CacheUpdate { month: may() });
    }

    #[tokio::test]
    async fn test_calendar_list_failure_is_retryable() {
        let source = seeded_source().await;
        source
            .fail_calendars(Some(SourceError::Auth("expired".to_string())))
            .await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.wait_idle().await;
        assert_eq!(cache.status(may()), Some(MonthStatus::Empty));

        source.fail_calendars(None).await;
        cache.get_events_in_month(may());
        cache.wait_idle().await;

        assert_eq!(source.calendar_requests(), 2);
        assert_eq!(cache.status(may()), Some(MonthStatus::Ready));
    }

    #[tokio::test]
    async fn test_timeout_leaves_month_retryable() {
        let source = seeded_source().await;
        source
            .set_latency(Some(std::time::Duration::from_secs(5)))
            .await;
        let cache = EventCache::new(
            Arc::new(source.clone()),
            EventCacheConfig {
                fetch_timeout: std::time::Duration::from_millis(50),
            },
        )
        .unwrap();

        cache.get_events_in_month(may());
        cache.wait_idle().await;

        assert_eq!(cache.status(may()), Some(MonthStatus::Empty));
    }

    #[tokio::test]
    async fn test_clear_cache_waits_for_inflight_fetches() {
        let source = seeded_source().await;
        source.hold();
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.get_events_in_month(may().succ());

        let clearing = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.clear_cache().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!clearing.is_finished());

        source.release();
        clearing.await.unwrap();

        assert_eq!(cache.status(may()), None);
        assert_eq!(cache.status(may().succ()), None);

        // Next access starts from an empty month and fetches again.
        assert!(cache.get_events_in_month(may()).is_empty());
        assert_eq!(cache.status(may()), Some(MonthStatus::Pending));
        cache.wait_idle().await;
        assert_eq!(source.calendar_requests(), 2);
    }

    #[tokio::test]
    async fn test_hidden_calendar_events_are_cached() {
        let source = seeded_source().await;
        source
            .add_calendar(
                CalendarMeta::new("archive", "Archive", Rgb::BLACK).with_hidden(true),
                vec![RawEvent::all_day(
                    "Archived",
                    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                    NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                )],
            )
            .await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.wait_idle().await;
        let events = cache.get_events_in_month(may());

        assert_eq!(source.event_requests(), 3);
        assert_eq!(events.iter().filter(|e| e.subject == "Archived").count(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_refetches_calendar_list() {
        let source = seeded_source().await;
        let cache = cache_for(&source);

        cache.get_events_in_month(may());
        cache.wait_idle().await;

        source
            .add_calendar(
                CalendarMeta::new("team", "Team", Rgb::WHITE),
                vec![RawEvent::timed("Offsite", at(5, 21, 9), ChronoDuration::hours(8))],
            )
            .await;
        cache.clear_cache().await;
        cache.get_events_in_month(may());
        cache.wait_idle().await;

        let events = cache.get_events_in_month(may());
        assert!(events.iter().any(|e| e.subject == "Offsite"));
        assert_eq!(source.calendar_requests(), 2);
    }

    #[tokio::test]
    async fn test_on_update_callback() {
        let source = seeded_source().await;
        let cache = cache_for(&source);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _listener = cache.on_update(move || {
            let _ = tx.send(());
        });

        cache.get_events_in_month(may());
        cache.get_events_in_month(may().succ());

        for _ in 0..2 {
            tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
                .await
                .expect("callback should fire")
                .unwrap();
        }
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = EventCache::new(Arc::new(InMemorySource::new()), EventCacheConfig::default());
        assert!(matches!(result, Err(CacheError::NoRuntime)));
    }
}

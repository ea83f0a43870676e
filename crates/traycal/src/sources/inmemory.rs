//! In-memory calendar source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::{watch, RwLock};

use traycal_core::calendar::{CalendarMeta, RawEvent};
use traycal_core::source::{CalendarSource, Result, SourceError};

/// In-memory calendar source for tests and embedding.
///
/// Besides serving fixed data it counts requests, can fail on demand, can
/// hold event requests until released and can add artificial latency.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    calendars: Arc<RwLock<Vec<CalendarMeta>>>,
    events: Arc<RwLock<HashMap<String, Vec<RawEvent>>>>,
    calendar_failure: Arc<RwLock<Option<SourceError>>>,
    event_failure: Arc<RwLock<Option<SourceError>>>,
    latency: Arc<RwLock<Option<Duration>>>,
    held: Arc<watch::Sender<bool>>,
    calendar_requests: Arc<AtomicUsize>,
    event_requests: Arc<AtomicUsize>,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySource {
    /// Creates a source with no calendars.
    pub fn new() -> Self {
        let (held, _) = watch::channel(false);
        Self {
            calendars: Arc::new(RwLock::new(Vec::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
            calendar_failure: Arc::new(RwLock::new(None)),
            event_failure: Arc::new(RwLock::new(None)),
            latency: Arc::new(RwLock::new(None)),
            held: Arc::new(held),
            calendar_requests: Arc::new(AtomicUsize::new(0)),
            event_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a calendar with its events.
    pub async fn add_calendar(&self, calendar: CalendarMeta, events: Vec<RawEvent>) {
        self.events
            .write()
            .await
            .insert(calendar.id.clone(), events);
        self.calendars.write().await.push(calendar);
    }

    /// Makes `list_calendars` fail with `error` until cleared with `None`.
    pub async fn fail_calendars(&self, error: Option<SourceError>) {
        *self.calendar_failure.write().await = error;
    }

    /// Makes `list_events` fail with `error` until cleared with `None`.
    pub async fn fail_events(&self, error: Option<SourceError>) {
        *self.event_failure.write().await = error;
    }

    /// Delays every `list_events` call by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Parks every `list_events` call until [`InMemorySource::release`].
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Lets held and future `list_events` calls proceed.
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Number of `list_calendars` calls so far.
    pub fn calendar_requests(&self) -> usize {
        self.calendar_requests.load(Ordering::SeqCst)
    }

    /// Number of `list_events` calls so far.
    pub fn event_requests(&self) -> usize {
        self.event_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarSource for InMemorySource {
    async fn list_calendars(&self) -> Result<Vec<CalendarMeta>> {
        self.calendar_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.calendar_failure.read().await.clone() {
            return Err(err);
        }
        Ok(self.calendars.read().await.clone())
    }

    async fn list_events(
        &self,
        calendar: &CalendarMeta,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<RawEvent>> {
        self.event_requests.fetch_add(1, Ordering::SeqCst);

        let mut held = self.held.subscribe();
        // The sender lives in `self`, so waiting cannot observe a closed channel.
        let _ = held.wait_for(|held| !*held).await;

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(err) = self.event_failure.read().await.clone() {
            return Err(err);
        }

        let events = self.events.read().await;
        Ok(events
            .get(&calendar.id)
            .map(|events| {
                events
                    .iter()
                    .filter(|e| e.start < end && e.start + e.duration >= start)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

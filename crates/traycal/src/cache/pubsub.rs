//! "New data available" notifications.
//!
//! Fetch completions are fanned out over a tokio broadcast channel. Consumers
//! either hold a receiver or register a callback that a single task drives,
//! so the callback never runs concurrently with itself.

use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use traycal_core::calendar::MonthKey;

/// Channel capacity for update messages.
const CHANNEL_CAPACITY: usize = 64;

/// A month finished fetching. Consumers should re-query the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheUpdate {
    pub month: MonthKey,
}

#[derive(Debug, Clone)]
pub(crate) struct UpdateNotifier {
    sender: broadcast::Sender<CacheUpdate>,
}

impl UpdateNotifier {
    pub(crate) fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub(crate) fn publish(&self, update: CacheUpdate) {
        // No receivers just means nobody is listening yet.
        let _ = self.sender.send(update);
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<CacheUpdate> {
        self.sender.subscribe()
    }

    /// Drives `callback` from one task on `runtime` until the notifier is dropped.
    ///
    /// Missed updates (a lagging receiver) collapse into a single call.
    pub(crate) fn on_update<F>(&self, runtime: &Handle, mut callback: F) -> JoinHandle<()>
    where
        F: FnMut() + Send + 'static,
    {
        let mut receiver = self.subscribe();
        runtime.spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(update) => {
                        tracing::trace!(month = %update.month, "Delivering cache update");
                        callback();
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Cache update listener lagged");
                        callback();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

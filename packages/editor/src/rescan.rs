//! Keeps the element registry current.
//!
//! Two triggers: structural mutation records, and a coarse polling tick for
//! changes the observer never reports (content swapped in by code that
//! bypasses the tree, for instance). Bursts of records are coalesced into a
//! single rescan.

use campus_dom::MutationObserver;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::time::MissedTickBehavior;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Anything that can rebuild its view of the tree
pub trait Rescan {
    /// Returns the number of registered elements afterwards
    fn rescan(&mut self) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RescanStats {
    pub from_mutations: u64,
    pub from_polling: u64,
}

pub struct RescanTask {
    observer: MutationObserver,
    poll_interval: Duration,
}

impl RescanTask {
    pub fn new(observer: MutationObserver) -> Self {
        Self {
            observer,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run until `shutdown` fires (or its sender is dropped) or the tree goes away
    pub async fn run<R>(mut self, target: Arc<Mutex<R>>, mut shutdown: oneshot::Receiver<()>) -> RescanStats
    where
        R: Rescan + Send,
    {
        let mut stats = RescanStats::default();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                record = self.observer.next() => {
                    if record.is_none() {
                        break;
                    }
                    self.observer.take_records();
                    let count = target.lock().await.rescan();
                    stats.from_mutations += 1;
                    tracing::trace!(count, "rescan after mutation");
                }
                _ = ticker.tick() => {
                    target.lock().await.rescan();
                    stats.from_polling += 1;
                }
            }
        }

        tracing::debug!(?stats, "rescan task stopped");
        stats
    }
}

//! Transient save indicators.
//!
//! In-flight writes report back through an unbounded channel; the feed
//! collects them on `poll` and hides each one after its time to live.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

pub const SAVED_TTL: Duration = Duration::from_secs(2);
pub const FAILED_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Saved,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    pub kind: IndicatorKind,
    pub content_id: String,
    pub message: String,
    pub shown_at: Instant,
}

impl Indicator {
    pub fn saved(content_id: impl Into<String>) -> Self {
        Self {
            kind: IndicatorKind::Saved,
            content_id: content_id.into(),
            message: "Saved".to_string(),
            shown_at: Instant::now(),
        }
    }

    pub fn failed(content_id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            kind: IndicatorKind::Failed,
            content_id: content_id.into(),
            message: format!("Save failed: {}", error),
            shown_at: Instant::now(),
        }
    }

    pub fn ttl(&self) -> Duration {
        match self.kind {
            IndicatorKind::Saved => SAVED_TTL,
            IndicatorKind::Failed => FAILED_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= self.ttl()
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorSender(mpsc::UnboundedSender<Indicator>);

impl IndicatorSender {
    pub fn post(&self, indicator: Indicator) {
        // The feed may already be gone after teardown
        let _ = self.0.send(indicator);
    }
}

#[derive(Debug)]
pub struct IndicatorFeed {
    sender: mpsc::UnboundedSender<Indicator>,
    receiver: mpsc::UnboundedReceiver<Indicator>,
    visible: Vec<Indicator>,
}

impl IndicatorFeed {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            visible: Vec::new(),
        }
    }

    pub fn sender(&self) -> IndicatorSender {
        IndicatorSender(self.sender.clone())
    }

    /// Pull in new indicators and drop expired ones
    pub fn poll(&mut self) -> &[Indicator] {
        while let Ok(indicator) = self.receiver.try_recv() {
            self.visible.push(indicator);
        }
        let now = Instant::now();
        self.visible.retain(|indicator| !indicator.is_expired(now));
        &self.visible
    }

    pub fn visible(&self) -> &[Indicator] {
        &self.visible
    }
}

impl Default for IndicatorFeed {
    fn default() -> Self {
        Self::new()
    }
}

use crate::errors::Result;
use campus_content::{ContentChange, ContentRecord, ContentStore};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Reactive point read of one content record.
///
/// Holds a cached copy and refreshes it when the store announces a change
/// to the same id. A lagged feed is treated as "maybe changed".
pub struct ContentQuery {
    id: String,
    store: Arc<dyn ContentStore>,
    changes: broadcast::Receiver<ContentChange>,
    record: Option<ContentRecord>,
}

impl ContentQuery {
    pub async fn new(store: Arc<dyn ContentStore>, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        // Subscribe before the first read so no change slips in between
        let changes = store.subscribe();
        let record = store.read(&id).await?;
        Ok(Self {
            id,
            store,
            changes,
            record,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn record(&self) -> Option<&ContentRecord> {
        self.record.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.record.as_ref().map(|record| record.content.as_str())
    }

    pub(crate) fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    pub async fn refresh(&mut self) -> Result<()> {
        self.record = self.store.read(&self.id).await?;
        Ok(())
    }

    /// Apply whatever changes are already queued. Returns whether the
    /// record was re-read.
    pub async fn sync(&mut self) -> Result<bool> {
        let mut stale = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => stale |= change.id == self.id,
                Err(TryRecvError::Lagged(_)) => stale = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.refresh().await?;
        }
        Ok(stale)
    }

    /// Wait for the next change to this record. Returns `false` once the
    /// store has gone away.
    pub async fn changed(&mut self) -> Result<bool> {
        loop {
            match self.changes.recv().await {
                Ok(change) if change.id == self.id => break,
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(id = %self.id, skipped, "content feed lagged");
                    break;
                }
                Err(RecvError::Closed) => return Ok(false),
            }
        }
        self.refresh().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_content::{ContentType, ContentWrite, MemoryStore};

    #[tokio::test]
    async fn test_sync_picks_up_matching_changes_only() {
        let store = Arc::new(MemoryStore::new());
        let mut query = ContentQuery::new(store.clone(), "about.mission.heading").await.unwrap();
        assert!(query.record().is_none());

        store
            .write(ContentWrite::new("about.history.body", "Founded 1921", ContentType::RichText, "about"))
            .await
            .unwrap();
        assert!(!query.sync().await.unwrap());

        store
            .write(ContentWrite::new("about.mission.heading", "Our mission", ContentType::Text, "about"))
            .await
            .unwrap();
        assert!(query.sync().await.unwrap());
        assert_eq!(query.content(), Some("Our mission"));
    }

    #[tokio::test]
    async fn test_changed_waits_for_own_id() {
        let store = Arc::new(MemoryStore::new());
        let mut query = ContentQuery::new(store.clone(), "home.hero.title").await.unwrap();

        let writer = store.clone();
        tokio::spawn(async move {
            writer
                .write(ContentWrite::new("home.hero.subtitle", "x", ContentType::Text, "home"))
                .await
                .unwrap();
            writer
                .write(ContentWrite::new("home.hero.title", "Hello", ContentType::Text, "home"))
                .await
                .unwrap();
        });

        assert!(query.changed().await.unwrap());
        assert_eq!(query.content(), Some("Hello"));
    }
}

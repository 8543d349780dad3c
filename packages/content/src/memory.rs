//! In-process document store.
//!
//! Backs the HTTP server and the test suites. Records live in a map keyed by
//! content id, with a secondary index by page.

use crate::record::{
    ContentPatch, ContentRecord, ContentWrite, MediaQuery, MediaRecord, NewMedia,
};
use crate::store::{ContentChange, ContentStore, MediaLibrary};
use crate::{ContentError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::{broadcast, RwLock};

const CHANGE_CHANNEL_CAPACITY: usize = 256;

#[derive(Default)]
struct StoreInner {
    records: HashMap<String, ContentRecord>,
    by_page: HashMap<String, BTreeSet<String>>,
    media: Vec<MediaRecord>,
    next_record_id: u64,
    next_media_id: u64,
}

impl StoreInner {
    fn index(&mut self, page: &str, id: &str) {
        self.by_page
            .entry(page.to_string())
            .or_default()
            .insert(id.to_string());
    }

    fn unindex(&mut self, page: &str, id: &str) {
        if let Some(ids) = self.by_page.get_mut(page) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_page.remove(page);
            }
        }
    }

    fn patch_existing(&mut self, id: &str, patch: &ContentPatch) -> Option<ContentRecord> {
        let record = self.records.get_mut(id)?;
        let old_page = record.page.clone();
        patch.apply_to(record, Utc::now());
        let updated = record.clone();

        if updated.page != old_page {
            self.unindex(&old_page, id);
            self.index(&updated.page, id);
        }
        Some(updated)
    }
}

pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    changes: broadcast::Sender<ContentChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(StoreInner::default()),
            changes,
        }
    }

    /// Number of content records
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn publish(&self, record: &ContentRecord) {
        // No receivers is fine
        let _ = self.changes.send(ContentChange {
            id: record.id.clone(),
            page: record.page.clone(),
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn read(&self, id: &str) -> Result<Option<ContentRecord>> {
        Ok(self.inner.read().await.records.get(id).cloned())
    }

    async fn write(&self, write: ContentWrite) -> Result<ContentRecord> {
        if write.id.is_empty() {
            return Err(ContentError::EmptyId);
        }

        let record = {
            let mut inner = self.inner.write().await;
            match inner.patch_existing(&write.id, &write.to_patch()) {
                Some(updated) => {
                    tracing::debug!(id = %write.id, "patched content record");
                    updated
                }
                None => {
                    inner.next_record_id += 1;
                    let record = write.into_record(inner.next_record_id, Utc::now());
                    inner.index(&record.page, &record.id);
                    inner.records.insert(record.id.clone(), record.clone());
                    tracing::debug!(id = %record.id, "inserted content record");
                    record
                }
            }
        };

        self.publish(&record);
        Ok(record)
    }

    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentRecord> {
        let record = self
            .inner
            .write()
            .await
            .patch_existing(id, &patch)
            .ok_or_else(|| ContentError::NotFound(id.to_string()))?;

        self.publish(&record);
        Ok(record)
    }

    async fn list_page(&self, page: &str) -> Result<Vec<ContentRecord>> {
        let inner = self.inner.read().await;
        let records = inner
            .by_page
            .get(page)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    fn subscribe(&self) -> broadcast::Receiver<ContentChange> {
        self.changes.subscribe()
    }
}

#[async_trait]
impl MediaLibrary for MemoryStore {
    async fn add_media(&self, media: NewMedia) -> Result<MediaRecord> {
        let mut inner = self.inner.write().await;
        inner.next_media_id += 1;

        let record = MediaRecord {
            media_id: format!("media-{}", inner.next_media_id),
            url: media.url,
            provider: media.provider,
            media_type: media.media_type,
            alt: media.alt,
            width: media.width,
            height: media.height,
            tags: media.tags,
            created_at: Utc::now(),
        };
        inner.media.push(record.clone());

        tracing::debug!(media_id = %record.media_id, "registered media");
        Ok(record)
    }

    async fn list_media(&self, query: MediaQuery) -> Result<Vec<MediaRecord>> {
        let inner = self.inner.read().await;
        let limit = query.effective_limit();

        // Insertion order is creation order
        let media = inner
            .media
            .iter()
            .rev()
            .filter(|m| match &query.tag {
                Some(tag) => m.tags.iter().any(|t| t == tag),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect();
        Ok(media)
    }
}

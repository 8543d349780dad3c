//! # Store Boundary
//!
//! The document store is an external collaborator. Everything the site needs
//! from it goes through these traits:
//!
//! - `write` is an upsert keyed by content id. Lookup first; patch when the
//!   id exists, insert otherwise.
//! - `read` is a single-record point lookup.
//! - Every successful write or patch publishes a `ContentChange` so reactive
//!   readers can refresh.
//!
//! There is no batching and no transaction spanning ids. Two writes to
//! different ids land in whatever order the store sees them.

use crate::record::{ContentPatch, ContentRecord, ContentWrite, MediaQuery, MediaRecord, NewMedia};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Published after a record is created or updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChange {
    pub id: String,
    pub page: String,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Point lookup by content id
    async fn read(&self, id: &str) -> Result<Option<ContentRecord>>;

    /// Upsert by content id
    async fn write(&self, write: ContentWrite) -> Result<ContentRecord>;

    /// Partial update of an existing record
    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentRecord>;

    /// All records belonging to a page, ordered by content id
    async fn list_page(&self, page: &str) -> Result<Vec<ContentRecord>>;

    /// Change feed for reactive reads
    fn subscribe(&self) -> broadcast::Receiver<ContentChange>;
}

#[async_trait]
pub trait MediaLibrary: Send + Sync {
    async fn add_media(&self, media: NewMedia) -> Result<MediaRecord>;

    /// Newest first, at most `MAX_MEDIA_PAGE_SIZE` records
    async fn list_media(&self, query: MediaQuery) -> Result<Vec<MediaRecord>>;
}

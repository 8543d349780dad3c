//! # Campus Content
//!
//! Content model and persistence boundary for the campus site.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: page → section → item descriptors │
//! │  - static, defined at build time            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: ContentStore / MediaLibrary traits   │
//! │  - upsert by content id                     │
//! │  - point reads, page listing                │
//! │  - change feed for reactive reads           │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↓
//! ┌──────────────────┐   ┌──────────────────────┐
//! │ MemoryStore      │   │ HttpContentStore     │
//! │ (in-process)     │   │ (REST over reqwest)  │
//! └──────────────────┘   └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One record per content id**: writes look up by id before inserting
//! 2. **Independent fields**: every write commits on its own, no batching
//! 3. **Last write wins**: no merge, no version check across sessions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_content::{ContentStore, ContentType, ContentWrite, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store
//!     .write(ContentWrite::new("home.hero.title", "Welcome", ContentType::Text, "home"))
//!     .await?;
//!
//! let record = store.read("home.hero.title").await?;
//! ```

mod errors;
mod http;
mod memory;
mod record;
pub mod registry;
pub mod slider;
mod store;

pub use errors::{ContentError, Result};
pub use http::HttpContentStore;
pub use memory::MemoryStore;
pub use record::{
    ContentPatch, ContentRecord, ContentType, ContentWrite, MediaQuery, MediaRecord, MediaType,
    NewMedia, MAX_MEDIA_PAGE_SIZE,
};
pub use registry::{EditableItemDescriptor, PageContent, SectionContent};
pub use slider::SliderImages;
pub use store::{ContentChange, ContentStore, MediaLibrary};

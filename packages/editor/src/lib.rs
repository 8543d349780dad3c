//! # Campus Editor
//!
//! Live-edit overlay for the campus site.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ edit_mode: URL flags + auth → can_edit      │
//! │  - supervisor disables on session expiry    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ scanner: marked nodes → id registry         │
//! │  - rescan on mutation, 1 Hz polling         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ lifecycle: one inline editor at a time      │
//! │  - optimistic DOM update on commit          │
//! │  - write handed to the store, not awaited   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ overlay: declarative text / image / slider  │
//! │  and panel components on reactive reads     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Fields save independently**: no batching, no rollback
//! 2. **Edit mode is navigation state**: it lives in the URL
//! 3. **The registry is disposable**: every scan rebuilds it from the tree
//!
//! ## Usage
//!
//! ```rust,ignore
//! use campus_editor::{Key, LiveEdit};
//!
//! let mut session = LiveEdit::new(dom, store, url, true);
//! session.enable_edit_mode()?;
//!
//! session.click(title_node)?;
//! session.input("Welcome back");
//! session.key(Key::Enter)?;
//! ```

mod edit_mode;
mod errors;
mod indicator;
mod lifecycle;
mod marker;
pub mod overlay;
mod rescan;
mod scanner;
mod session;
mod supervisor;

pub use edit_mode::{EditModeState, NavigationFlags, EDIT_FLAG, PANEL_FLAG};
pub use errors::{EditorError, Result};
pub use indicator::{Indicator, IndicatorFeed, IndicatorKind, IndicatorSender, FAILED_TTL, SAVED_TTL};
pub use lifecycle::{
    CommitOutcome, EditorKind, EditorLifecycle, EditorPhase, EditorSlot, InlineEditor, Key,
    MULTILINE_THRESHOLD,
};
pub use marker::{EditableMarker, MarkerKind, MARKER_ATTR, MARKER_PAGE_ATTR, MARKER_TYPE_ATTR};
pub use rescan::{Rescan, RescanStats, RescanTask, POLL_INTERVAL};
pub use scanner::{snapshot, EditableElement, ElementRegistry, SnapshotSource};
pub use session::{page_for_url, LiveEdit, DEFAULT_PAGE};
pub use supervisor::{AuthSupervisor, NoticeKind, SessionNotice};

//! # Editor Lifecycle
//!
//! ```text
//! idle ──click──▶ editing ──Enter / blur──▶ saving ──▶ idle
//!                    │
//!                    └──Escape──▶ idle (no write)
//! ```
//!
//! At most one inline editor exists at a time. The slot that holds it is
//! released on every transition out of `editing`, and opening a new editor
//! commits the previous one first.
//!
//! Commits are optimistic: the element's visible content changes before the
//! write is confirmed. A failed write raises an indicator and leaves the
//! element as edited.

use crate::errors::Result;
use crate::indicator::{Indicator, IndicatorSender};
use crate::scanner::{ElementRegistry, SnapshotSource};
use campus_content::{registry, ContentStore, ContentType, ContentWrite};
use campus_dom::{DomTree, NodeId, Rect};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Content longer than this opens a multi-line editor
pub const MULTILINE_THRESHOLD: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    SingleLine,
    MultiLine,
}

impl EditorKind {
    fn for_content(tag: Option<&str>, content: &str) -> Self {
        if tag == Some("textarea") || content.chars().count() > MULTILINE_THRESHOLD {
            EditorKind::MultiLine
        } else {
            EditorKind::SingleLine
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    ShiftEnter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Idle,
    Editing,
    /// No editor open, at least one write still in flight
    Saving,
}

/// The transient editor overlaying one element
#[derive(Debug, Clone, PartialEq)]
pub struct InlineEditor {
    pub content_id: String,
    pub node: NodeId,
    pub kind: EditorKind,
    pub value: String,
    /// Value the element showed when the editor opened
    pub last_known: String,
    /// Bounding box captured at open; not updated on later layout shifts
    pub rect: Rect,
    pub content_type: ContentType,
    pub page: String,
    pub source: SnapshotSource,
    /// `src` of an image edited through its alt text; the record keeps it as content
    pub image_src: Option<String>,
}

/// Owned slot for the single active editor
#[derive(Debug, Default)]
pub struct EditorSlot {
    active: Option<InlineEditor>,
}

impl EditorSlot {
    /// Returns the editor that was displaced, if any
    pub fn occupy(&mut self, editor: InlineEditor) -> Option<InlineEditor> {
        self.active.replace(editor)
    }

    pub fn release(&mut self) -> Option<InlineEditor> {
        self.active.take()
    }

    pub fn get(&self) -> Option<&InlineEditor> {
        self.active.as_ref()
    }

    fn get_mut(&mut self) -> Option<&mut InlineEditor> {
        self.active.as_mut()
    }

    pub fn is_occupied(&self) -> bool {
        self.active.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Trimmed value matched the last known value; nothing written
    Unchanged,
    /// DOM updated and a write is in flight
    Saving { content_id: String },
    Discarded,
}

pub struct EditorLifecycle {
    slot: EditorSlot,
    store: Arc<dyn ContentStore>,
    indicators: IndicatorSender,
    pending: Vec<JoinHandle<()>>,
    writes_issued: u64,
}

impl EditorLifecycle {
    pub fn new(store: Arc<dyn ContentStore>, indicators: IndicatorSender) -> Self {
        Self {
            slot: EditorSlot::default(),
            store,
            indicators,
            pending: Vec::new(),
            writes_issued: 0,
        }
    }

    pub fn editor(&self) -> Option<&InlineEditor> {
        self.slot.get()
    }

    pub fn phase(&self) -> EditorPhase {
        if self.slot.is_occupied() {
            EditorPhase::Editing
        } else if self.pending.iter().any(|handle| !handle.is_finished()) {
            EditorPhase::Saving
        } else {
            EditorPhase::Idle
        }
    }

    /// Writes handed to the store since this lifecycle was created
    pub fn writes_issued(&self) -> u64 {
        self.writes_issued
    }

    /// Open an editor over the registered element at or above `node`.
    ///
    /// Returns `false` when the node is not editable. Clicking the element
    /// that is already being edited keeps the current editor.
    pub fn open(
        &mut self,
        tree: &mut DomTree,
        registry: &mut ElementRegistry,
        node: NodeId,
        session_page: &str,
    ) -> Result<bool> {
        let Some(element) = registry.element_for_node(tree, node) else {
            return Ok(false);
        };

        if let Some(active) = self.slot.get() {
            if active.content_id == element.id {
                return Ok(true);
            }
        }

        let descriptor = registry::find_item(&element.id);
        let editor = InlineEditor {
            content_id: element.id.clone(),
            node: element.node,
            kind: EditorKind::for_content(tree.tag(element.node), &element.current_content),
            value: element.current_content.clone(),
            last_known: element.current_content.clone(),
            rect: tree.rect(element.node).unwrap_or_default(),
            content_type: descriptor
                .map(|d| d.content_type)
                .unwrap_or_else(|| element.marker.kind.content_type()),
            page: element
                .marker
                .page
                .clone()
                .or_else(|| descriptor.map(|d| d.page.to_string()))
                .unwrap_or_else(|| session_page.to_string()),
            source: element.source,
            image_src: match element.source {
                SnapshotSource::Alt => tree.attribute(element.node, "src").map(str::to_string),
                _ => None,
            },
        };

        if self.slot.is_occupied() {
            self.commit(tree, registry)?;
        }

        tracing::debug!(id = %editor.content_id, kind = ?editor.kind, "editor opened");
        self.slot.occupy(editor);
        Ok(true)
    }

    /// Replace the editor's value. Returns `false` with no editor open.
    pub fn input(&mut self, value: impl Into<String>) -> bool {
        match self.slot.get_mut() {
            Some(editor) => {
                editor.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn key(
        &mut self,
        tree: &mut DomTree,
        registry: &mut ElementRegistry,
        key: Key,
    ) -> Result<Option<CommitOutcome>> {
        let Some(kind) = self.slot.get().map(|editor| editor.kind) else {
            return Ok(None);
        };

        match key {
            Key::ShiftEnter if kind == EditorKind::MultiLine => {
                if let Some(editor) = self.slot.get_mut() {
                    editor.value.push('\n');
                }
                Ok(None)
            }
            Key::Enter | Key::ShiftEnter => self.commit(tree, registry).map(Some),
            Key::Escape => Ok(Some(self.discard())),
            Key::Other => Ok(None),
        }
    }

    /// Focus left the editor
    pub fn blur(&mut self, tree: &mut DomTree, registry: &mut ElementRegistry) -> Result<Option<CommitOutcome>> {
        if !self.slot.is_occupied() {
            return Ok(None);
        }
        self.commit(tree, registry).map(Some)
    }

    /// Close without writing; the element keeps its last committed content
    pub fn discard(&mut self) -> CommitOutcome {
        if let Some(editor) = self.slot.release() {
            tracing::debug!(id = %editor.content_id, "editor discarded");
        }
        CommitOutcome::Discarded
    }

    /// Close the editor, update the element and hand the write to the store
    pub fn commit(&mut self, tree: &mut DomTree, registry: &mut ElementRegistry) -> Result<CommitOutcome> {
        let Some(editor) = self.slot.release() else {
            return Ok(CommitOutcome::Discarded);
        };

        let value = editor.value.trim().to_string();
        if value == editor.last_known.trim() {
            tracing::debug!(id = %editor.content_id, "commit unchanged, skipping write");
            return Ok(CommitOutcome::Unchanged);
        }

        if tree.contains(editor.node) {
            apply_to_node(tree, editor.node, editor.source, &value)?;
        } else {
            tracing::warn!(id = %editor.content_id, "edited element left the page before commit");
        }
        registry.set_current(&editor.content_id, value.clone());

        let write = match editor.source {
            SnapshotSource::Alt => ContentWrite::new(
                editor.content_id.clone(),
                editor.image_src.clone().unwrap_or_default(),
                editor.content_type,
                editor.page.clone(),
            )
            .with_alt(value),
            _ => ContentWrite::new(
                editor.content_id.clone(),
                value,
                editor.content_type,
                editor.page.clone(),
            ),
        };
        self.spawn_write(write);

        Ok(CommitOutcome::Saving {
            content_id: editor.content_id,
        })
    }

    fn spawn_write(&mut self, write: ContentWrite) {
        let store = Arc::clone(&self.store);
        let indicators = self.indicators.clone();
        self.writes_issued += 1;
        self.pending.retain(|handle| !handle.is_finished());

        self.pending.push(tokio::spawn(async move {
            let id = write.id.clone();
            match store.write(write).await {
                Ok(record) => {
                    tracing::info!(id = %record.id, page = %record.page, "content saved");
                    indicators.post(Indicator::saved(id));
                }
                Err(err) => {
                    tracing::error!(%id, error = %err, "content save failed");
                    indicators.post(Indicator::failed(id, &err));
                }
            }
        }));
    }

    /// Wait for every in-flight write to finish
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.pending) {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "save task did not complete");
            }
        }
    }
}

fn apply_to_node(tree: &mut DomTree, node: NodeId, source: SnapshotSource, value: &str) -> Result<()> {
    match source {
        SnapshotSource::Alt => tree.set_attribute(node, "alt", value)?,
        SnapshotSource::Src => tree.set_attribute(node, "src", value)?,
        SnapshotSource::Value => tree.set_attribute(node, "value", value)?,
        SnapshotSource::Text | SnapshotSource::Markup => tree.set_text_content(node, value)?,
    }
    Ok(())
}

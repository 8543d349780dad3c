use super::require_edit;
use crate::edit_mode::EditModeState;
use crate::errors::{EditorError, Result};
use campus_content::{
    registry, ContentChange, ContentRecord, ContentStore, ContentWrite, EditableItemDescriptor,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// One registry item next to whatever is stored for it
#[derive(Debug, Clone, PartialEq)]
pub struct PanelItem {
    pub descriptor: &'static EditableItemDescriptor,
    pub record: Option<ContentRecord>,
}

impl PanelItem {
    pub fn value(&self) -> &str {
        self.record
            .as_ref()
            .map(|record| record.content.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    pub name: &'static str,
    pub items: Vec<PanelItem>,
}

/// Side panel listing every editable item of a page, grouped by section
pub struct EditPanel {
    store: Arc<dyn ContentStore>,
    page: String,
    changes: broadcast::Receiver<ContentChange>,
    sections: Vec<PanelSection>,
}

impl EditPanel {
    pub async fn new(store: Arc<dyn ContentStore>, page: impl Into<String>) -> Result<Self> {
        let changes = store.subscribe();
        let mut panel = Self {
            store,
            page: page.into(),
            changes,
            sections: Vec::new(),
        };
        panel.refresh().await?;
        Ok(panel)
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Shown only with `panel` set and a signed-in user
    pub fn is_visible(&self, mode: &EditModeState) -> bool {
        mode.is_panel_open() && mode.can_edit()
    }

    pub fn sections(&self) -> &[PanelSection] {
        &self.sections
    }

    pub fn item(&self, id: &str) -> Option<&PanelItem> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| item.descriptor.id == id)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let mut stored: HashMap<String, ContentRecord> = self
            .store
            .list_page(&self.page)
            .await?
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        self.sections = registry::page(&self.page)
            .map(|page| {
                page.sections
                    .iter()
                    .map(|section| PanelSection {
                        name: section.name,
                        items: section
                            .items
                            .iter()
                            .map(|descriptor| PanelItem {
                                descriptor,
                                record: stored.remove(descriptor.id),
                            })
                            .collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(())
    }

    /// Reload if any queued change touched this page
    pub async fn sync(&mut self) -> Result<bool> {
        let mut stale = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => stale |= change.page == self.page,
                Err(TryRecvError::Lagged(_)) => stale = true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.refresh().await?;
        }
        Ok(stale)
    }

    /// Save one registry item using its registered type and page
    pub async fn save(&mut self, mode: &EditModeState, id: &str, value: &str) -> Result<ContentRecord> {
        require_edit(mode)?;
        let descriptor = registry::find_item(id).ok_or_else(|| EditorError::UnknownItem(id.to_string()))?;

        let write = ContentWrite::new(descriptor.id, value.trim(), descriptor.content_type, descriptor.page);
        let record = self.store.write(write).await?;
        tracing::info!(id = %record.id, page = %record.page, "panel item saved");

        if descriptor.page == self.page {
            self.refresh().await?;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit_mode::NavigationFlags;
    use campus_content::{ContentType, MemoryStore};

    fn state(edit: bool, panel: bool, authenticated: bool) -> EditModeState {
        EditModeState::new(NavigationFlags { edit, panel }, authenticated)
    }

    #[tokio::test]
    async fn test_groups_registry_items_with_records() {
        let store = Arc::new(MemoryStore::new());
        store
            .write(ContentWrite::new("about.mission.heading", "Our mission", ContentType::Text, "about"))
            .await
            .unwrap();

        let panel = EditPanel::new(store, "about").await.unwrap();
        let names: Vec<_> = panel.sections().iter().map(|s| s.name).collect();
        assert_eq!(names, ["mission", "principal"]);
        assert_eq!(panel.item("about.mission.heading").unwrap().value(), "Our mission");
        assert_eq!(panel.item("about.mission.body").unwrap().value(), "");
    }

    #[tokio::test]
    async fn test_visibility() {
        let store = Arc::new(MemoryStore::new());
        let panel = EditPanel::new(store, "home").await.unwrap();
        assert!(panel.is_visible(&state(true, true, true)));
        assert!(!panel.is_visible(&state(true, false, true)));
        assert!(!panel.is_visible(&state(true, true, false)));
    }

    #[tokio::test]
    async fn test_save_uses_registered_type() {
        let store = Arc::new(MemoryStore::new());
        let mut panel = EditPanel::new(store.clone(), "home").await.unwrap();

        let record = panel
            .save(&state(true, true, true), "home.welcome.body", "  Hello families  ")
            .await
            .unwrap();
        assert_eq!(record.content_type, ContentType::RichText);
        assert_eq!(record.content, "Hello families");
        assert_eq!(panel.item("home.welcome.body").unwrap().value(), "Hello families");

        let err = panel
            .save(&state(true, true, true), "home.unknown", "x")
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::UnknownItem(_)));
    }

    #[tokio::test]
    async fn test_sync_reloads_on_page_change() {
        let store = Arc::new(MemoryStore::new());
        let mut panel = EditPanel::new(store.clone(), "contact").await.unwrap();

        store
            .write(ContentWrite::new("home.hero.title", "Hi", ContentType::Text, "home"))
            .await
            .unwrap();
        assert!(!panel.sync().await.unwrap());

        store
            .write(ContentWrite::new("contact.details.phone", "555-0100", ContentType::Text, "contact"))
            .await
            .unwrap();
        assert!(panel.sync().await.unwrap());
        assert_eq!(panel.item("contact.details.phone").unwrap().value(), "555-0100");
    }
}

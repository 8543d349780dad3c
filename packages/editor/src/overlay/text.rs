use super::{content_type_for, require_edit, ContentQuery};
use crate::edit_mode::EditModeState;
use crate::errors::Result;
use crate::marker::EditableMarker;
use campus_content::{ContentStore, ContentType, ContentWrite};
use campus_dom::El;
use std::sync::Arc;

/// Editable text region backed by one record
pub struct TextField {
    query: ContentQuery,
    page: String,
    fallback: String,
    content_type: ContentType,
}

impl TextField {
    pub async fn new(
        store: Arc<dyn ContentStore>,
        id: impl Into<String>,
        page: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        let content_type = content_type_for(&id, ContentType::Text);
        Ok(Self {
            query: ContentQuery::new(store, id).await?,
            page: page.into(),
            fallback: fallback.into(),
            content_type,
        })
    }

    pub fn id(&self) -> &str {
        self.query.id()
    }

    /// Stored text, or the built-in copy until the first save
    pub fn text(&self) -> &str {
        self.query.content().unwrap_or(&self.fallback)
    }

    /// Carries the editable marker only while the user can edit
    pub fn render(&self, tag: &str, mode: &EditModeState) -> El {
        let el = El::new(tag).text(self.text());
        if mode.can_edit() {
            EditableMarker::text(self.id()).on_page(self.page.as_str()).mark(el)
        } else {
            el
        }
    }

    pub async fn sync(&mut self) -> Result<bool> {
        self.query.sync().await
    }

    /// Returns `false` when the trimmed value matches what is shown
    pub async fn save(&mut self, mode: &EditModeState, value: &str) -> Result<bool> {
        require_edit(mode)?;

        let value = value.trim();
        if value == self.text().trim() {
            return Ok(false);
        }

        let write = ContentWrite::new(self.id(), value, self.content_type, self.page.as_str());
        self.query.store().write(write).await?;
        tracing::info!(id = %self.id(), "text saved");
        self.query.refresh().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit_mode::NavigationFlags;
    use crate::errors::EditorError;
    use campus_content::MemoryStore;
    use campus_dom::DomTree;

    fn editing() -> EditModeState {
        EditModeState::new(NavigationFlags { edit: true, panel: false }, true)
    }

    #[tokio::test]
    async fn test_fallback_until_saved() {
        let store = Arc::new(MemoryStore::new());
        let mut field = TextField::new(store.clone(), "home.hero.title", "home", "Welcome")
            .await
            .unwrap();
        assert_eq!(field.text(), "Welcome");

        assert!(!field.save(&editing(), " Welcome ").await.unwrap());
        assert!(store.is_empty().await);

        assert!(field.save(&editing(), "Welcome to Northfield").await.unwrap());
        assert_eq!(field.text(), "Welcome to Northfield");
    }

    #[tokio::test]
    async fn test_save_requires_edit_mode() {
        let store = Arc::new(MemoryStore::new());
        let mut field = TextField::new(store.clone(), "home.hero.title", "home", "Welcome")
            .await
            .unwrap();

        let signed_out = EditModeState::new(NavigationFlags { edit: true, panel: false }, false);
        let err = field.save(&signed_out, "Changed").await.unwrap_err();
        assert!(matches!(err, EditorError::AuthenticationRequired));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_render_marks_only_in_edit_mode() {
        let store = Arc::new(MemoryStore::new());
        let field = TextField::new(store, "about.mission.heading", "about", "Our mission")
            .await
            .unwrap();

        let mut tree = DomTree::new();
        let root = tree.root();
        let marked = field.render("h2", &editing()).mount(&mut tree, root).unwrap();
        assert_eq!(
            tree.outer_html(marked),
            r#"<h2 data-editable="about.mission.heading" data-edit-type="text" data-edit-page="about">Our mission</h2>"#
        );

        let plain = field
            .render("h2", &EditModeState::new(NavigationFlags::default(), true))
            .mount(&mut tree, root)
            .unwrap();
        assert_eq!(tree.outer_html(plain), "<h2>Our mission</h2>");
    }
}

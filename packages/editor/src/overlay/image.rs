use super::{content_type_for, require_edit, ContentQuery};
use crate::edit_mode::EditModeState;
use crate::errors::Result;
use crate::marker::EditableMarker;
use campus_content::{ContentStore, ContentType, ContentWrite, MediaRecord};
use campus_dom::El;
use std::sync::Arc;

/// Editable image: `content` holds the URL, `alt` and `mediaId` ride along
pub struct ImageField {
    query: ContentQuery,
    page: String,
    fallback_src: String,
    fallback_alt: String,
}

impl ImageField {
    pub async fn new(
        store: Arc<dyn ContentStore>,
        id: impl Into<String>,
        page: impl Into<String>,
        fallback_src: impl Into<String>,
        fallback_alt: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            query: ContentQuery::new(store, id).await?,
            page: page.into(),
            fallback_src: fallback_src.into(),
            fallback_alt: fallback_alt.into(),
        })
    }

    pub fn id(&self) -> &str {
        self.query.id()
    }

    pub fn src(&self) -> &str {
        self.query
            .content()
            .filter(|src| !src.is_empty())
            .unwrap_or(&self.fallback_src)
    }

    pub fn alt(&self) -> &str {
        self.query
            .record()
            .and_then(|record| record.alt.as_deref())
            .unwrap_or(&self.fallback_alt)
    }

    pub fn media_id(&self) -> Option<&str> {
        self.query.record().and_then(|record| record.media_id.as_deref())
    }

    pub fn render(&self, mode: &EditModeState) -> El {
        let el = El::new("img").attr("src", self.src()).attr("alt", self.alt());
        if mode.can_edit() {
            EditableMarker::image(self.id()).on_page(self.page.as_str()).mark(el)
        } else {
            el
        }
    }

    pub async fn sync(&mut self) -> Result<bool> {
        self.query.sync().await
    }

    /// Point at a new URL, keeping the current alt text
    pub async fn set_image(&mut self, mode: &EditModeState, url: &str) -> Result<()> {
        require_edit(mode)?;
        let write = self.base_write(url.trim()).with_alt(self.alt());
        self.save(write).await
    }

    pub async fn set_alt(&mut self, mode: &EditModeState, alt: &str) -> Result<()> {
        require_edit(mode)?;
        let write = self.base_write(self.src()).with_alt(alt.trim());
        self.save(write).await
    }

    /// Use an asset from the media library; its alt text wins when present
    pub async fn choose_media(&mut self, mode: &EditModeState, media: &MediaRecord) -> Result<()> {
        require_edit(mode)?;
        let alt = media.alt.as_deref().unwrap_or(self.alt());
        let write = self
            .base_write(&media.url)
            .with_media_id(media.media_id.as_str())
            .with_alt(alt);
        self.save(write).await
    }

    fn base_write(&self, src: &str) -> ContentWrite {
        ContentWrite::new(
            self.id(),
            src,
            content_type_for(self.id(), ContentType::Image),
            self.page.as_str(),
        )
    }

    async fn save(&mut self, write: ContentWrite) -> Result<()> {
        self.query.store().write(write).await?;
        tracing::info!(id = %self.id(), "image saved");
        self.query.refresh().await
    }
}

use super::{content_type_for, require_edit, ContentQuery};
use crate::edit_mode::EditModeState;
use crate::errors::Result;
use campus_content::{ContentError, ContentStore, ContentType, ContentWrite, SliderImages};
use campus_dom::El;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderState {
    Ready(SliderImages),
    /// Stored payload is not a JSON array of URLs
    Malformed(String),
}

/// Image carousel stored as one JSON array record.
///
/// Every edit re-reads the whole array from the store, changes it and writes
/// it back. A malformed payload blocks edits until `reset`.
pub struct ImageSlider {
    query: ContentQuery,
    page: String,
    state: SliderState,
    index: usize,
    interval: Duration,
    last_advance: Instant,
}

impl ImageSlider {
    pub async fn new(store: Arc<dyn ContentStore>, id: impl Into<String>, page: impl Into<String>) -> Result<Self> {
        let query = ContentQuery::new(store, id).await?;
        let state = decode(&query);
        Ok(Self {
            query,
            page: page.into(),
            state,
            index: 0,
            interval: AUTOPLAY_INTERVAL,
            last_advance: Instant::now(),
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn id(&self) -> &str {
        self.query.id()
    }

    pub fn state(&self) -> &SliderState {
        &self.state
    }

    pub fn images(&self) -> &[String] {
        match &self.state {
            SliderState::Ready(images) => images.urls(),
            SliderState::Malformed(_) => &[],
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&str> {
        self.images().get(self.index).map(String::as_str)
    }

    /// Advance the autoplay position. Paused while edit mode is on; the timer
    /// restarts when it turns off.
    pub fn tick(&mut self, mode: &EditModeState) -> Option<usize> {
        let now = Instant::now();
        if mode.is_edit_mode() {
            self.last_advance = now;
            return None;
        }

        let len = self.images().len();
        if len < 2 || now.duration_since(self.last_advance) < self.interval {
            return None;
        }
        self.index = (self.index + 1) % len;
        self.last_advance = now;
        Some(self.index)
    }

    pub fn render(&self) -> El {
        match &self.state {
            SliderState::Malformed(reason) => El::new("div")
                .attr("class", "slider slider-error")
                .attr("role", "alert")
                .text(format!("This gallery could not be loaded: {}", reason)),
            SliderState::Ready(images) => {
                let slides = images.urls().iter().enumerate().map(|(i, url)| {
                    let slide = El::new("img").attr("src", url.as_str()).attr("alt", "");
                    if i == self.index {
                        slide.attr("class", "slide active")
                    } else {
                        slide.attr("class", "slide")
                    }
                });
                El::new("div").attr("class", "slider").children(slides)
            }
        }
    }

    pub async fn sync(&mut self) -> Result<bool> {
        let changed = self.query.sync().await?;
        if changed {
            self.update_state();
        }
        Ok(changed)
    }

    pub async fn append(&mut self, mode: &EditModeState, url: &str) -> Result<()> {
        self.edit(mode, |images| {
            images.append(url);
            Ok(())
        })
        .await
    }

    pub async fn replace(&mut self, mode: &EditModeState, index: usize, url: &str) -> Result<()> {
        self.edit(mode, |images| images.replace(index, url)).await
    }

    pub async fn remove(&mut self, mode: &EditModeState, index: usize) -> Result<()> {
        self.edit(mode, |images| images.remove(index).map(|_| ())).await
    }

    pub async fn move_up(&mut self, mode: &EditModeState, index: usize) -> Result<()> {
        self.edit(mode, |images| images.move_up(index)).await
    }

    pub async fn move_down(&mut self, mode: &EditModeState, index: usize) -> Result<()> {
        self.edit(mode, |images| images.move_down(index)).await
    }

    /// Overwrite whatever is stored with an empty gallery
    pub async fn reset(&mut self, mode: &EditModeState) -> Result<()> {
        require_edit(mode)?;
        tracing::warn!(id = %self.id(), "resetting slider content");
        self.write(SliderImages::default()).await
    }

    async fn edit<F>(&mut self, mode: &EditModeState, change: F) -> Result<()>
    where
        F: FnOnce(&mut SliderImages) -> std::result::Result<(), ContentError>,
    {
        require_edit(mode)?;

        // Always start from the stored array, not the cached one
        self.query.refresh().await?;
        self.update_state();
        let mut images = SliderImages::parse(self.query.id(), self.query.content().unwrap_or_default())?;

        change(&mut images)?;
        self.write(images).await
    }

    async fn write(&mut self, images: SliderImages) -> Result<()> {
        let write = ContentWrite::new(
            self.id(),
            images.to_content(),
            content_type_for(self.id(), ContentType::ImageSlider),
            self.page.as_str(),
        );
        self.query.store().write(write).await?;
        tracing::info!(id = %self.id(), images = images.len(), "slider saved");
        self.query.refresh().await?;
        self.update_state();
        Ok(())
    }

    fn update_state(&mut self) {
        self.state = decode(&self.query);
        let len = self.images().len();
        if self.index >= len {
            self.index = 0;
        }
    }
}

fn decode(query: &ContentQuery) -> SliderState {
    match SliderImages::parse(query.id(), query.content().unwrap_or_default()) {
        Ok(images) => SliderState::Ready(images),
        Err(err) => {
            tracing::warn!(id = %query.id(), error = %err, "slider content is malformed");
            SliderState::Malformed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit_mode::NavigationFlags;
    use crate::errors::EditorError;
    use campus_content::MemoryStore;
    use campus_dom::DomTree;

    const SLIDER: &str = "home.gallery.slider";

    fn editing() -> EditModeState {
        EditModeState::new(NavigationFlags { edit: true, panel: false }, true)
    }

    fn viewing() -> EditModeState {
        EditModeState::new(NavigationFlags::default(), true)
    }

    async fn seeded(content: &str) -> (Arc<MemoryStore>, ImageSlider) {
        let store = Arc::new(MemoryStore::new());
        store
            .write(ContentWrite::new(SLIDER, content, ContentType::ImageSlider, "home"))
            .await
            .unwrap();
        let slider = ImageSlider::new(store.clone(), SLIDER, "home").await.unwrap();
        (store, slider)
    }

    async fn stored(store: &MemoryStore) -> String {
        store.read(SLIDER).await.unwrap().unwrap().content
    }

    #[tokio::test]
    async fn test_operations_rewrite_whole_array() {
        let (store, mut slider) = seeded(r#"["a.jpg","b.jpg"]"#).await;

        slider.append(&editing(), "c.jpg").await.unwrap();
        assert_eq!(stored(&store).await, r#"["a.jpg","b.jpg","c.jpg"]"#);

        slider.move_up(&editing(), 1).await.unwrap();
        assert_eq!(stored(&store).await, r#"["b.jpg","a.jpg","c.jpg"]"#);

        slider.remove(&editing(), 0).await.unwrap();
        assert_eq!(stored(&store).await, r#"["a.jpg","c.jpg"]"#);
        assert_eq!(slider.images(), ["a.jpg".to_string(), "c.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_edit_reads_latest_stored_array() {
        let (store, mut slider) = seeded(r#"["a.jpg"]"#).await;

        // Another session appends behind this component's back
        store
            .write(ContentWrite::new(SLIDER, r#"["a.jpg","z.jpg"]"#, ContentType::ImageSlider, "home"))
            .await
            .unwrap();

        slider.append(&editing(), "b.jpg").await.unwrap();
        assert_eq!(stored(&store).await, r#"["a.jpg","z.jpg","b.jpg"]"#);
    }

    #[tokio::test]
    async fn test_malformed_blocks_edits_until_reset() {
        let (store, mut slider) = seeded("not json").await;
        assert!(matches!(slider.state(), SliderState::Malformed(_)));
        let mut tree = DomTree::new();
        let root = tree.root();
        let banner = slider.render().mount(&mut tree, root).unwrap();
        assert_eq!(tree.attribute(banner, "role"), Some("alert"));

        let err = slider.append(&editing(), "a.jpg").await.unwrap_err();
        assert!(matches!(err, EditorError::Content(ContentError::MalformedSlider { .. })));
        assert_eq!(stored(&store).await, "not json");

        slider.reset(&editing()).await.unwrap();
        slider.append(&editing(), "a.jpg").await.unwrap();
        assert_eq!(stored(&store).await, r#"["a.jpg"]"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_pauses_in_edit_mode() {
        let (_store, mut slider) = seeded(r#"["a.jpg","b.jpg","c.jpg"]"#).await;

        tokio::time::advance(AUTOPLAY_INTERVAL).await;
        assert_eq!(slider.tick(&viewing()), Some(1));

        tokio::time::advance(AUTOPLAY_INTERVAL * 3).await;
        assert_eq!(slider.tick(&editing()), None);
        assert_eq!(slider.current(), Some("b.jpg"));

        // Timer restarts after edit mode ends
        assert_eq!(slider.tick(&viewing()), None);
        tokio::time::advance(AUTOPLAY_INTERVAL).await;
        assert_eq!(slider.tick(&viewing()), Some(2));
    }
}

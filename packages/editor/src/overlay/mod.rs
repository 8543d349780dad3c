//! # Declarative Overlay Components
//!
//! Counterparts to the DOM-scanning editor. They read the same records
//! through reactive queries, render through the `El` builder and write
//! through the same store. Every write needs `can_edit`.

mod image;
mod panel;
mod query;
mod slider;
mod text;

pub use image::ImageField;
pub use panel::{EditPanel, PanelItem, PanelSection};
pub use query::ContentQuery;
pub use slider::{ImageSlider, SliderState, AUTOPLAY_INTERVAL};
pub use text::TextField;

use crate::edit_mode::EditModeState;
use crate::errors::{EditorError, Result};
use campus_content::{registry, ContentType};

fn require_edit(mode: &EditModeState) -> Result<()> {
    if mode.can_edit() {
        Ok(())
    } else {
        Err(EditorError::AuthenticationRequired)
    }
}

/// Registered type for an id, `fallback` for ids outside the registry
fn content_type_for(id: &str, fallback: ContentType) -> ContentType {
    registry::find_item(id)
        .map(|item| item.content_type)
        .unwrap_or(fallback)
}

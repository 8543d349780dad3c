//! Editable markers: the attributes that make an element live-editable.
//!
//! ```html
//! <h1 data-editable="home.hero.title" data-edit-type="text" data-edit-page="home">…</h1>
//! ```

use campus_content::ContentType;
use campus_dom::{DomTree, El, NodeId};

pub const MARKER_ATTR: &str = "data-editable";
pub const MARKER_TYPE_ATTR: &str = "data-edit-type";
pub const MARKER_PAGE_ATTR: &str = "data-edit-page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Text,
    Image,
}

impl MarkerKind {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("image") => MarkerKind::Image,
            _ => MarkerKind::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Text => "text",
            MarkerKind::Image => "image",
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            MarkerKind::Text => ContentType::Text,
            MarkerKind::Image => ContentType::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableMarker {
    pub id: String,
    pub kind: MarkerKind,
    pub page: Option<String>,
}

impl EditableMarker {
    pub fn text(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MarkerKind::Text,
            page: None,
        }
    }

    pub fn image(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: MarkerKind::Image,
            page: None,
        }
    }

    pub fn on_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Marker carried by `node`, if any. An empty id is not a marker.
    pub fn read(tree: &DomTree, node: NodeId) -> Option<Self> {
        let id = tree.attribute(node, MARKER_ATTR)?;
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            kind: MarkerKind::parse(tree.attribute(node, MARKER_TYPE_ATTR)),
            page: tree
                .attribute(node, MARKER_PAGE_ATTR)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }

    /// Add the marker attributes to a builder element
    pub fn mark(&self, el: El) -> El {
        let el = el
            .attr(MARKER_ATTR, self.id.as_str())
            .attr(MARKER_TYPE_ATTR, self.kind.as_str());
        match &self.page {
            Some(page) => el.attr(MARKER_PAGE_ATTR, page.as_str()),
            None => el,
        }
    }
}

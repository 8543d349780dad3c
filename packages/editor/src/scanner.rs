//! # Element Scanner
//!
//! Builds the id → element registry from the live tree.
//!
//! A scan is always wholesale: clear, walk, re-populate. Duplicate ids are
//! not an error; the later element in document order wins.
//!
//! ## Content snapshots
//!
//! | Node | Snapshot |
//! |---|---|
//! | `img` | `alt` if non-empty, else `src` |
//! | `input`, `textarea` | `value` |
//! | anything else | rendered text, or inner markup when there is no text |
//!
//! The snapshot remembers where it came from so a commit writes back to the
//! same place.

use crate::marker::{EditableMarker, MARKER_ATTR};
use campus_dom::{DomTree, NodeId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Alt,
    Src,
    Value,
    Text,
    Markup,
}

/// Scan-derived view of one marked element
#[derive(Debug, Clone, PartialEq)]
pub struct EditableElement {
    pub id: String,
    pub node: NodeId,
    pub marker: EditableMarker,
    pub original_content: String,
    pub current_content: String,
    pub source: SnapshotSource,
}

/// Read the editable content of a node
pub fn snapshot(tree: &DomTree, node: NodeId) -> (String, SnapshotSource) {
    match tree.tag(node) {
        Some("img") => match tree.attribute(node, "alt").filter(|alt| !alt.is_empty()) {
            Some(alt) => (alt.to_string(), SnapshotSource::Alt),
            None => (
                tree.attribute(node, "src").unwrap_or_default().to_string(),
                SnapshotSource::Src,
            ),
        },
        Some("input") | Some("textarea") => {
            let value = tree
                .attribute(node, "value")
                .map(str::to_string)
                .unwrap_or_else(|| tree.text_content(node));
            (value, SnapshotSource::Value)
        }
        _ => {
            let text = tree.text_content(node);
            let text = text.trim();
            if text.is_empty() {
                (tree.inner_html(node), SnapshotSource::Markup)
            } else {
                (text.to_string(), SnapshotSource::Text)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: HashMap<String, EditableElement>,
    scans: u64,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear and re-populate from every marked node under the root
    pub fn scan(&mut self, tree: &DomTree) -> usize {
        self.elements.clear();
        self.scans += 1;

        for node in tree.find_by_attribute(MARKER_ATTR) {
            let Some(marker) = EditableMarker::read(tree, node) else {
                continue;
            };
            let (content, source) = snapshot(tree, node);

            self.elements.insert(
                marker.id.clone(),
                EditableElement {
                    id: marker.id.clone(),
                    node,
                    marker,
                    original_content: content.clone(),
                    current_content: content,
                    source,
                },
            );
        }

        tracing::debug!(count = self.elements.len(), scan = self.scans, "scanned editable elements");
        self.elements.len()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn get(&self, id: &str) -> Option<&EditableElement> {
        self.elements.get(id)
    }

    /// Registered element for a node or its nearest marked ancestor.
    ///
    /// A node shadowed by a later duplicate id resolves to nothing.
    pub fn element_for_node(&self, tree: &DomTree, node: NodeId) -> Option<&EditableElement> {
        let marked = std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|n| EditableMarker::read(tree, *n).is_some())?;
        let marker = EditableMarker::read(tree, marked)?;

        self.elements
            .get(&marker.id)
            .filter(|element| element.node == marked)
    }

    /// Record a committed value. Returns false for unknown ids.
    pub fn set_current(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.current_content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditableElement> {
        self.elements.values()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of scans performed so far
    pub fn scan_count(&self) -> u64 {
        self.scans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_dom::El;

    fn page() -> (DomTree, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let nodes = vec![
            EditableMarker::text("home.hero.title")
                .mark(El::new("h1").text("  Welcome  "))
                .mount(&mut tree, root)
                .unwrap(),
            EditableMarker::image("home.hero.image")
                .mark(El::new("img").attr("src", "/hero.jpg").attr("alt", ""))
                .mount(&mut tree, root)
                .unwrap(),
            EditableMarker::text("contact.details.email")
                .mark(El::new("input").attr("value", "office@school.example"))
                .mount(&mut tree, root)
                .unwrap(),
            EditableMarker::text("home.welcome.body")
                .mark(El::new("div").child(El::new("br")))
                .mount(&mut tree, root)
                .unwrap(),
        ];
        (tree, nodes)
    }

    #[test]
    fn test_snapshots() {
        let (tree, nodes) = page();
        assert_eq!(snapshot(&tree, nodes[0]), ("Welcome".to_string(), SnapshotSource::Text));
        assert_eq!(snapshot(&tree, nodes[1]), ("/hero.jpg".to_string(), SnapshotSource::Src));
        assert_eq!(
            snapshot(&tree, nodes[2]),
            ("office@school.example".to_string(), SnapshotSource::Value)
        );
        assert_eq!(snapshot(&tree, nodes[3]), ("<br>".to_string(), SnapshotSource::Markup));
    }

    #[test]
    fn test_image_prefers_alt() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let img = El::new("img")
            .attr("src", "/a.jpg")
            .attr("alt", "Library")
            .mount(&mut tree, root)
            .unwrap();
        assert_eq!(snapshot(&tree, img), ("Library".to_string(), SnapshotSource::Alt));
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let first = EditableMarker::text("dup")
            .mark(El::new("p").text("first"))
            .mount(&mut tree, root)
            .unwrap();
        let second = EditableMarker::text("dup")
            .mark(El::new("p").text("second"))
            .mount(&mut tree, root)
            .unwrap();

        let mut registry = ElementRegistry::new();
        assert_eq!(registry.scan(&tree), 1);
        assert_eq!(registry.get("dup").unwrap().node, second);
        assert_eq!(registry.get("dup").unwrap().original_content, "second");
        assert!(registry.element_for_node(&tree, first).is_none());
    }

    #[test]
    fn test_click_on_descendant_resolves_marked_ancestor() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let para = EditableMarker::text("about.mission.body")
            .mark(El::new("p").child(El::new("strong").text("Learn")))
            .mount(&mut tree, root)
            .unwrap();
        let strong = tree.children(para)[0];

        let mut registry = ElementRegistry::new();
        registry.scan(&tree);
        let element = registry.element_for_node(&tree, strong).unwrap();
        assert_eq!(element.id, "about.mission.body");
        assert_eq!(element.node, para);
    }

    #[test]
    fn test_rescan_replaces_wholesale() {
        let (mut tree, nodes) = page();
        let mut registry = ElementRegistry::new();
        assert_eq!(registry.scan(&tree), 4);
        registry.set_current("home.hero.title", "Edited");

        tree.remove(nodes[1]).unwrap();
        assert_eq!(registry.scan(&tree), 3);
        assert!(registry.get("home.hero.image").is_none());
        assert_eq!(registry.get("home.hero.title").unwrap().current_content, "Welcome");
        assert_eq!(registry.scan_count(), 2);
    }
}

//! # Node Tree
//!
//! Arena of nodes addressed by `NodeId`. Removed nodes leave a hole, so a
//! stale id can never alias a newer node.
//!
//! Holes are never reclaimed: the arena grows with every node created over
//! the tree's lifetime, not with the live node count. Fine at page scale;
//! repeated remounts over a long session keep growing it.
//!
//! Only changes to nodes connected to the root are reported to observers,
//! mirroring an observer registered on the document body with subtree
//! coverage. Building a detached subtree and mounting it produces a single
//! child-list record.

use crate::node::{Node, NodeData, NodeId, Rect};
use crate::observer::{MutationKind, MutationObserver, MutationRecord, ObserveOptions, ObserverSlot};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Cannot remove the root node")]
    CannotRemoveRoot,
}

pub type Result<T> = std::result::Result<T, DomError>;

pub struct DomTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    observers: Vec<ObserverSlot>,
}

impl DomTree {
    /// Empty document with a `body` root
    pub fn new() -> Self {
        let root = Node::new(NodeData::Element {
            tag: "body".to_string(),
            attributes: Vec::new(),
        });
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(DomError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, connected or not
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(data)));
        id
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.into(),
            attributes: Vec::new(),
        })
    }

    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text {
            content: content.into(),
        })
    }

    pub fn create_comment(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment {
            content: content.into(),
        })
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent chain, nearest first, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Whether the node is attached under the root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Pre-order walk starting at (and including) `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.node(parent).ok_or(DomError::NodeNotFound(parent))?.is_element() {
            return Err(DomError::NotAnElement(parent));
        }
        if !self.contains(child) {
            return Err(DomError::NodeNotFound(child));
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::CycleDetected);
        }

        self.detach(child);
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);

        self.notify(MutationRecord {
            kind: MutationKind::ChildList,
            target: parent,
            attribute: None,
        });
        Ok(())
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DomError::CannotRemoveRoot);
        }
        if !self.contains(id) {
            return Err(DomError::NodeNotFound(id));
        }

        let parent = self.parent(id);
        let connected = self.is_connected(id);
        self.detach(id);
        for node in self.descendants(id) {
            self.nodes[node.0] = None;
        }

        if let (Some(parent), true) = (parent, connected) {
            self.notify(MutationRecord {
                kind: MutationKind::ChildList,
                target: parent,
                attribute: None,
            });
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            if let Ok(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|c| *c != id);
            }
            if let Ok(node) = self.node_mut(id) {
                node.parent = None;
            }
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.tag())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attribute(name))
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        let value = value.into();

        match &mut self.node_mut(id)?.data {
            NodeData::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(key, _)| *key == name) {
                    Some((_, existing)) => *existing = value,
                    None => attributes.push((name.clone(), value)),
                }
            }
            _ => return Err(DomError::NotAnElement(id)),
        }

        self.notify(MutationRecord {
            kind: MutationKind::Attributes,
            target: id,
            attribute: Some(name),
        });
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        let removed = match &mut self.node_mut(id)?.data {
            NodeData::Element { attributes, .. } => {
                let before = attributes.len();
                attributes.retain(|(key, _)| key != name);
                attributes.len() != before
            }
            _ => return Err(DomError::NotAnElement(id)),
        };

        if removed {
            self.notify(MutationRecord {
                kind: MutationKind::Attributes,
                target: id,
                attribute: Some(name.to_string()),
            });
        }
        Ok(())
    }

    /// All connected elements carrying `name`, in document order
    pub fn find_by_attribute(&self, name: &str) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.attribute(*id, name).is_some())
            .collect()
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(Node {
                data: NodeData::Text { content },
                ..
            }) = self.node(node)
            {
                out.push_str(content);
            }
        }
        out
    }

    /// Replace children with a single text node (or set a text node's data)
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        let text = text.into();

        if let NodeData::Text { content } = &mut self.node_mut(id)?.data {
            *content = text;
            self.notify(MutationRecord {
                kind: MutationKind::CharacterData,
                target: id,
                attribute: None,
            });
            return Ok(());
        }

        let old_children = std::mem::take(&mut self.node_mut(id)?.children);
        for child in old_children {
            for node in self.descendants(child) {
                self.nodes[node.0] = None;
            }
        }

        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.node_mut(text_node)?.parent = Some(id);
            self.node_mut(id)?.children.push(text_node);
        }

        self.notify(MutationRecord {
            kind: MutationKind::ChildList,
            target: id,
            attribute: None,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.rect)
    }

    /// Layout is computed elsewhere; this only records the result
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        self.node_mut(id)?.rect = rect;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn observe(&mut self, options: ObserveOptions) -> MutationObserver {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.observers.push(ObserverSlot { options, sender });
        MutationObserver::new(receiver)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, record: MutationRecord) {
        if !self.is_connected(record.target) {
            return;
        }

        tracing::trace!(kind = ?record.kind, target = %record.target, "dom mutation");
        self.observers.retain(|slot| {
            if slot.sender.is_closed() {
                return false;
            }
            if slot.options.wants(&record) {
                return slot.sender.send(record.clone()).is_ok();
            }
            true
        });
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

use crate::node::{NodeId, Rect};
use crate::tree::{DomTree, Result};

/// Declarative description of a subtree, mounted in one step
#[derive(Debug, Clone, PartialEq)]
pub enum El {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<El>,
        rect: Option<Rect>,
    },
    Text(String),
}

impl El {
    pub fn new(tag: impl Into<String>) -> Self {
        El::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            rect: None,
        }
    }

    pub fn text_node(content: impl Into<String>) -> Self {
        El::Text(content.into())
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let El::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.push((key.into(), value.into()));
        }
        self
    }

    pub fn child(mut self, child: El) -> Self {
        if let El::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = El>) -> Self {
        if let El::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Shorthand for a single text child
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(El::Text(content.into()))
    }

    pub fn rect(mut self, new_rect: Rect) -> Self {
        if let El::Element { ref mut rect, .. } = self {
            *rect = Some(new_rect);
        }
        self
    }

    /// Build detached, then attach under `parent` with a single mutation
    pub fn mount(self, tree: &mut DomTree, parent: NodeId) -> Result<NodeId> {
        let id = self.build(tree)?;
        tree.append_child(parent, id)?;
        Ok(id)
    }

    fn build(self, tree: &mut DomTree) -> Result<NodeId> {
        match self {
            El::Text(content) => Ok(tree.create_text(content)),
            El::Element {
                tag,
                attributes,
                children,
                rect,
            } => {
                let id = tree.create_element(tag);
                for (name, value) in attributes {
                    tree.set_attribute(id, name, value)?;
                }
                if let Some(rect) = rect {
                    tree.set_rect(id, rect)?;
                }
                for child in children {
                    let child_id = child.build(tree)?;
                    tree.append_child(id, child_id)?;
                }
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ObserveOptions;

    #[test]
    fn test_mount_emits_one_record() {
        let mut tree = DomTree::new();
        let mut observer = tree.observe(ObserveOptions::child_list());
        let root = tree.root();

        let list = El::new("ul")
            .children((0..3).map(|i| El::new("li").text(format!("item {}", i))))
            .rect(Rect::new(0.0, 10.0, 200.0, 60.0))
            .mount(&mut tree, root)
            .unwrap();

        assert_eq!(observer.take_records().len(), 1);
        assert_eq!(tree.children(list).len(), 3);
        assert_eq!(tree.rect(list), Some(Rect::new(0.0, 10.0, 200.0, 60.0)));
        assert_eq!(tree.text_content(list), "item 0item 1item 2");
    }

    #[test]
    fn test_text_builder_ignores_element_methods() {
        let text = El::text_node("plain").attr("class", "x").child(El::new("b"));
        assert_eq!(text, El::Text("plain".to_string()));
    }
}

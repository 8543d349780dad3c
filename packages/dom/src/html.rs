//! HTML serialization for node trees.

use crate::node::{NodeData, NodeId};
use crate::tree::DomTree;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

struct Context {
    buffer: String,
}

impl Context {
    fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Markup for the node itself and everything below it
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut ctx = Context::new();
    write_node(tree, id, &mut ctx);
    ctx.get_output()
}

fn write_node(tree: &DomTree, id: NodeId, ctx: &mut Context) {
    let Some(node) = tree.node(id) else {
        return;
    };

    match &node.data {
        NodeData::Text { content } => ctx.add(&escape_text(content)),
        NodeData::Comment { content } => {
            ctx.add("<!--");
            ctx.add(content);
            ctx.add("-->");
        }
        NodeData::Element { tag, attributes } => {
            ctx.add("<");
            ctx.add(tag);
            for (name, value) in attributes {
                ctx.add(" ");
                ctx.add(name);
                ctx.add("=\"");
                ctx.add(&escape_attribute(value));
                ctx.add("\"");
            }
            ctx.add(">");

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }

            for child in node.children() {
                write_node(tree, *child, ctx);
            }

            ctx.add("</");
            ctx.add(tag);
            ctx.add(">");
        }
    }
}

impl DomTree {
    /// Markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut ctx = Context::new();
        for child in self.children(id) {
            write_node(self, *child, &mut ctx);
        }
        ctx.get_output()
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        outer_html(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::El;

    #[test]
    fn test_serializes_nested_markup() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let section = El::new("section")
            .attr("class", "hero")
            .child(El::new("h1").text("Tom & Jerry"))
            .child(El::new("img").attr("src", "/a.jpg").attr("alt", "say \"hi\""))
            .mount(&mut tree, root)
            .unwrap();

        assert_eq!(
            tree.outer_html(section),
            r#"<section class="hero"><h1>Tom &amp; Jerry</h1><img src="/a.jpg" alt="say &quot;hi&quot;"></section>"#
        );
        assert_eq!(
            tree.inner_html(section),
            r#"<h1>Tom &amp; Jerry</h1><img src="/a.jpg" alt="say &quot;hi&quot;">"#
        );
    }

    #[test]
    fn test_comment_output() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let comment = tree.create_comment(" marker ");
        tree.append_child(root, comment).unwrap();
        assert_eq!(tree.inner_html(root), "<!-- marker -->");
    }
}

//! # Campus DOM
//!
//! A small arena-backed node tree standing in for the browser DOM.
//!
//! The live-edit engine never touches markup directly; it reads and writes
//! through `DomTree` handles (`NodeId`) and learns about structural changes
//! from `MutationObserver`s.
//!
//! ```text
//! El builder ──mount──▶ DomTree ──records──▶ MutationObserver
//!                          │
//!                          └──▶ html: inner/outer markup
//! ```

mod builder;
mod html;
mod node;
mod observer;
mod tree;

pub use builder::El;
pub use html::{escape_attribute, escape_text, outer_html};
pub use node::{Node, NodeData, NodeId, Rect};
pub use observer::{MutationKind, MutationObserver, MutationRecord, ObserveOptions};
pub use tree::{DomError, DomTree};

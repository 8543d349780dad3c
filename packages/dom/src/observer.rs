//! Mutation observation.
//!
//! Each observer owns the receiving half of an unbounded channel. The tree
//! keeps the sending halves and drops them once the observer goes away.

use crate::node::NodeId;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children added or removed
    ChildList,
    Attributes,
    CharacterData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    /// Attribute name for `Attributes` records
    pub attribute: Option<String>,
}

/// Which record kinds an observer wants
#[derive(Debug, Clone, Default)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub attributes: bool,
    /// Limit attribute records to these names (empty = all)
    pub attribute_filter: Vec<String>,
    pub character_data: bool,
}

impl ObserveOptions {
    /// Structural changes only
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            ..Default::default()
        }
    }

    pub fn with_attributes(mut self, filter: &[&str]) -> Self {
        self.attributes = true;
        self.attribute_filter = filter.iter().map(|name| name.to_string()).collect();
        self
    }

    pub(crate) fn wants(&self, record: &MutationRecord) -> bool {
        match record.kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
            MutationKind::Attributes => {
                self.attributes
                    && (self.attribute_filter.is_empty()
                        || record
                            .attribute
                            .as_ref()
                            .map(|name| self.attribute_filter.contains(name))
                            .unwrap_or(false))
            }
        }
    }
}

pub(crate) struct ObserverSlot {
    pub(crate) options: ObserveOptions,
    pub(crate) sender: mpsc::UnboundedSender<MutationRecord>,
}

pub struct MutationObserver {
    receiver: mpsc::UnboundedReceiver<MutationRecord>,
}

impl MutationObserver {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<MutationRecord>) -> Self {
        Self { receiver }
    }

    /// Wait for the next record; `None` once the tree is gone
    pub async fn next(&mut self) -> Option<MutationRecord> {
        self.receiver.recv().await
    }

    /// Drain everything queued so far
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        let mut records = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            records.push(record);
        }
        records
    }
}

//! DoaNode - one section of the authority register, with its children
//!
//! Nodes are owned by the forest that built them; nothing survives a
//! rebuild. A node carries all the display fields of its source item
//! plus the child list discovered during the build.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::hierarchy::code;
use crate::models::{ApproverEntry, DoaItem, NodeId};

/// One node of the browse forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoaNode {
    /// Identity: real item id or per-build synthetic index
    pub node_id: NodeId,

    /// Cleaned section code ("4.2.3", never a trailing dot)
    pub code: String,

    /// Explicit parent code from source data, cleaned, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Canonical document order position
    pub sort_order: i64,

    /// Raw approver list; normalization happens per visited node at
    /// render time, not here
    pub approvers: Vec<ApproverEntry>,

    /// True when the cleaned code has exactly one segment
    pub is_root: bool,

    /// Children in discovery order (roots are re-sorted numerically by
    /// the builder afterwards; child lists are not)
    pub children: Vec<DoaNode>,
}

impl DoaNode {
    /// Build a node from a source item. The code is cleaned here; the
    /// item itself is never mutated.
    pub fn from_item(item: &DoaItem) -> Self {
        let cleaned = code::clean_code(&item.code).to_string();
        let is_root = code::depth(&cleaned) == 1;
        Self {
            node_id: NodeId::Real(item.id),
            code: cleaned,
            parent_code: item
                .parent_code
                .as_deref()
                .map(|p| code::clean_code(p).to_string()),
            title: item.title.clone(),
            description: item.description.clone(),
            comments: item.comments.clone(),
            function_name: item.function_name.clone(),
            sort_order: item.sort_order,
            approvers: item.approvers.clone(),
            is_root,
            children: Vec::new(),
        }
    }

    /// Build a synthetic placeholder for a missing ancestor code,
    /// borrowing display fields from `source` when an item with the same
    /// code exists elsewhere in the unfiltered list.
    pub fn synthetic(arena_ix: u32, section_code: &str, source: Option<&DoaItem>) -> Self {
        let title = source
            .and_then(|s| s.title.clone())
            .unwrap_or_else(|| format!("Section {}", section_code));
        Self {
            node_id: NodeId::Synthetic(arena_ix),
            code: section_code.to_string(),
            parent_code: None,
            title: Some(title),
            description: source.and_then(|s| s.description.clone()),
            comments: source.and_then(|s| s.comments.clone()),
            function_name: source.and_then(|s| s.function_name.clone()),
            sort_order: source.map(|s| s.sort_order).unwrap_or(0),
            approvers: Vec::new(),
            is_root: code::depth(section_code) == 1,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: DoaNode) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total descendants below this node (recursive count)
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Collect all node ids in this subtree, including self
    pub fn collect_ids(&self, into: &mut HashSet<NodeId>) {
        into.insert(self.node_id);
        for child in &self.children {
            child.collect_ids(into);
        }
    }

    /// Find a node by id in this subtree
    pub fn find(&self, id: NodeId) -> Option<&DoaNode> {
        if self.node_id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Find the first node with the given cleaned code in this subtree
    pub fn find_by_code(&self, section_code: &str) -> Option<&DoaNode> {
        if self.code == section_code {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_code(section_code))
    }
}

/// The built forest: ordered roots plus the flat id set the host uses
/// to implement "expand all".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoaForest {
    pub roots: Vec<DoaNode>,
    pub node_ids: HashSet<NodeId>,
}

impl DoaForest {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total node count across all roots
    pub fn node_count(&self) -> usize {
        self.roots
            .iter()
            .map(|r| 1 + r.descendant_count())
            .sum()
    }

    /// Find a node anywhere in the forest
    pub fn find(&self, id: NodeId) -> Option<&DoaNode> {
        self.roots.iter().find_map(|r| r.find(id))
    }

    /// Find the first node with the given code anywhere in the forest
    pub fn find_by_code(&self, section_code: &str) -> Option<&DoaNode> {
        self.roots.iter().find_map(|r| r.find_by_code(section_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: i64, section_code: &str) -> DoaNode {
        DoaNode::from_item(&DoaItem {
            id,
            code: section_code.into(),
            sort_order: id,
            ..Default::default()
        })
    }

    fn sample_tree() -> DoaNode {
        let mut root = leaf(1, "2");
        let mut mid = leaf(2, "2.1");
        mid.add_child(leaf(3, "2.1.1"));
        mid.add_child(leaf(4, "2.1.2"));
        root.add_child(mid);
        root.add_child(leaf(5, "2.2"));
        root
    }

    #[test]
    fn test_from_item_cleans_code_and_flags_root() {
        let node = DoaNode::from_item(&DoaItem {
            id: 1,
            code: "3.".into(),
            sort_order: 1,
            ..Default::default()
        });
        assert_eq!(node.code, "3");
        assert!(node.is_root);

        let child = leaf(2, "3.1");
        assert!(!child.is_root);
    }

    #[test]
    fn test_descendant_count() {
        let tree = sample_tree();
        assert_eq!(tree.descendant_count(), 4);
        assert_eq!(tree.children[0].descendant_count(), 2);
    }

    #[test]
    fn test_collect_ids_covers_subtree() {
        let tree = sample_tree();
        let mut ids = HashSet::new();
        tree.collect_ids(&mut ids);
        assert_eq!(ids.len(), 5);
        assert!(ids.contains(&NodeId::Real(4)));
    }

    #[test]
    fn test_find_by_code() {
        let tree = sample_tree();
        let found = tree.find_by_code("2.1.2").unwrap();
        assert_eq!(found.node_id, NodeId::Real(4));
        assert!(tree.find_by_code("9").is_none());
    }

    #[test]
    fn test_synthetic_placeholder_title() {
        let node = DoaNode::synthetic(0, "3.1", None);
        assert_eq!(node.title.as_deref(), Some("Section 3.1"));
        assert!(node.node_id.is_synthetic());
        assert!(!node.is_root);
    }

    #[test]
    fn test_synthetic_borrows_display_fields() {
        let source = DoaItem {
            id: 9,
            code: "3".into(),
            title: Some("Procurement".into()),
            description: Some("All purchasing authority".into()),
            sort_order: 4,
            ..Default::default()
        };
        let node = DoaNode::synthetic(1, "3", Some(&source));
        assert_eq!(node.title.as_deref(), Some("Procurement"));
        assert_eq!(node.description.as_deref(), Some("All purchasing authority"));
        assert!(node.is_root);
    }
}

//! DOA item records and node identity
//!
//! An item is one row of the delegation-of-authority register: a
//! dot-coded section with its display fields and approval chain. Items
//! arrive as a flat list; the hierarchy module turns them into a forest.

use serde::{Deserialize, Serialize};

/// One approver requirement on an item: who approves and with which
/// action token (e.g. `"I1"`, `"R"`, `"EX*"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverEntry {
    pub role: String,
    pub action: String,
}

impl ApproverEntry {
    pub fn new(role: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            action: action.into(),
        }
    }
}

/// One authority-code item as loaded from the register.
///
/// `code` is a dot-separated run of positive integers and may carry one
/// trailing dot; it is NOT unique across a load (repeated sections are a
/// supported case). `sort_order` establishes canonical document order,
/// ties broken by original list position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoaItem {
    pub id: i64,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    pub sort_order: i64,
    #[serde(default)]
    pub approvers: Vec<ApproverEntry>,
}

/// Identity of a node in the browse forest.
///
/// `Real` nodes are backed 1:1 by an input item; `Synthetic` nodes are
/// placeholder ancestors manufactured during one build pass, numbered
/// from a per-build arena counter. Synthetic identity never leaves the
/// forest that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Real(i64),
    Synthetic(u32),
}

impl NodeId {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, NodeId::Synthetic(_))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Real(id) => write!(f, "{}", id),
            NodeId::Synthetic(ix) => write!(f, "synthetic:{}", ix),
        }
    }
}

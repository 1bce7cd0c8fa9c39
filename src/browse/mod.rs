//! Browse-session state
//!
//! The UI collaborator holds two pieces of state per browse session: the
//! current filter criteria (which drive a full rebuild of the forest)
//! and the set of expanded node ids (pure bookkeeping over whichever
//! forest is current). Nothing here renders anything.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::hierarchy::DoaForest;
use crate::models::NodeId;

/// Current search/function filter criteria. Empty strings mean the
/// corresponding filter is inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseFilter {
    /// Case-insensitive substring over code/title/description/comments
    pub search: String,
    /// Normalized function-name equality
    pub function: String,
}

impl BrowseFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Default::default()
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self {
            function: name.into(),
            ..Default::default()
        }
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || !self.function.is_empty()
    }
}

/// Expand/collapse bookkeeping for one browse session. Node ids are only
/// meaningful against the forest build they came from; callers reset or
/// re-derive this state when the forest is rebuilt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseState {
    expanded: HashSet<NodeId>,
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Toggle one node; returns the new expanded state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    /// Expand every node present in the forest.
    pub fn expand_all(&mut self, forest: &DoaForest) {
        self.expanded = forest.node_ids.clone();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_forest;
    use crate::models::DoaItem;

    fn two_level_items() -> Vec<DoaItem> {
        vec![
            DoaItem {
                id: 1,
                code: "1".into(),
                sort_order: 1,
                ..Default::default()
            },
            DoaItem {
                id: 2,
                code: "1.1".into(),
                sort_order: 2,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_filter_activity() {
        assert!(!BrowseFilter::default().is_active());
        assert!(BrowseFilter::search("x").is_active());
        assert!(BrowseFilter::function("Finance").is_active());
    }

    #[test]
    fn test_toggle() {
        let mut state = BrowseState::new();
        assert!(state.toggle(NodeId::Real(1)));
        assert!(state.is_expanded(NodeId::Real(1)));
        assert!(!state.toggle(NodeId::Real(1)));
        assert!(!state.is_expanded(NodeId::Real(1)));
    }

    #[test]
    fn test_expand_all_tracks_forest_ids() {
        let forest = build_forest(&two_level_items(), &BrowseFilter::default());
        let mut state = BrowseState::new();

        state.expand_all(&forest);
        assert_eq!(state.expanded_count(), 2);
        assert!(state.is_expanded(NodeId::Real(2)));

        state.collapse_all();
        assert_eq!(state.expanded_count(), 0);
    }
}

//! HierarchyBuilder - reconstructs the browse forest from the flat register
//!
//! The register is a flat list of dot-coded items with known defects:
//! repeated codes, parent codes that do not exist, parent codes equal to
//! the item's own code, trailing dots. The builder never errors; every
//! defect has a defined fallback so the result is always renderable.
//! All scratch state lives inside one invocation and is discarded with
//! it, so rebuilds are deterministic and side-effect free.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::browse::BrowseFilter;
use crate::hierarchy::code;
use crate::hierarchy::node::{DoaForest, DoaNode};
use crate::lookup;
use crate::models::{DoaItem, NodeId};

/// Build the browse forest for one load of items under the given filter.
///
/// Steps: clean codes, establish document order, apply search/function
/// filters (expanding the selection to cover ancestors), link every
/// surviving item to its resolved parent instance, scaffold missing
/// ancestors with synthetic placeholders, and sort roots numerically.
pub fn build_forest(items: &[DoaItem], filter: &BrowseFilter) -> DoaForest {
    Builder::new(items, filter).build()
}

/// One build pass. Everything in here is an arena owned by this
/// invocation; nothing is shared or cached across builds.
struct Builder<'a> {
    /// Full item list in canonical document order (sort_order, stable)
    ordered: Vec<&'a DoaItem>,
    filter: &'a BrowseFilter,

    /// Node arena keyed by identity, consumed during assembly
    nodes: HashMap<NodeId, DoaNode>,
    /// Child ids per parent, in discovery order
    children_of: HashMap<NodeId, Vec<NodeId>>,
    root_ids: Vec<NodeId>,

    /// Cleaned code -> (sort_order, id) occurrences in document order.
    /// Multiple items can legitimately share a code.
    occurrences: HashMap<String, Vec<(i64, NodeId)>>,

    /// Cleaned code -> first item in the UNFILTERED list with that code,
    /// used to borrow display fields for synthetic placeholders
    display_source: HashMap<String, &'a DoaItem>,

    next_synthetic: u32,
}

impl<'a> Builder<'a> {
    fn new(items: &'a [DoaItem], filter: &'a BrowseFilter) -> Self {
        // Canonical document order: sort_order ascending, ties keep the
        // original list position (stable sort).
        let mut ordered: Vec<&DoaItem> = items.iter().collect();
        ordered.sort_by_key(|item| item.sort_order);

        let mut display_source: HashMap<String, &DoaItem> = HashMap::new();
        for item in ordered.iter().copied() {
            display_source
                .entry(code::clean_code(&item.code).to_string())
                .or_insert(item);
        }

        Self {
            ordered,
            filter,
            nodes: HashMap::new(),
            children_of: HashMap::new(),
            root_ids: Vec::new(),
            occurrences: HashMap::new(),
            display_source,
            next_synthetic: 0,
        }
    }

    fn build(mut self) -> DoaForest {
        if self.ordered.is_empty() {
            return DoaForest::default();
        }

        let surviving = self.select();

        // Register every surviving item before linking: a child earlier
        // in document order may still need to resolve against a parent
        // occurrence that appears later.
        for item in &self.ordered {
            if !surviving.contains(&item.id) {
                continue;
            }
            let node = DoaNode::from_item(item);
            self.occurrences
                .entry(node.code.clone())
                .or_default()
                .push((item.sort_order, node.node_id));
            self.nodes.insert(node.node_id, node);
        }

        let link_order: Vec<&DoaItem> = self
            .ordered
            .iter()
            .copied()
            .filter(|item| surviving.contains(&item.id))
            .collect();
        for item in link_order {
            self.link(item);
        }

        self.assemble()
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Ids surviving the current filters, expanded to include every
    /// ancestor of every match so matched items stay reachable.
    fn select(&self) -> HashSet<i64> {
        if !self.filter.is_active() {
            return self.ordered.iter().map(|item| item.id).collect();
        }

        let matched: HashSet<i64> = self
            .ordered
            .iter()
            .filter(|item| self.matches(item))
            .map(|item| item.id)
            .collect();

        // Ancestor inclusion via nesting depth and document order alone:
        // parent codes are not always prefixes of child codes, so prefix
        // matching would miss ancestors. Walk the full sorted list with a
        // stack of currently open ancestors keyed by depth.
        let mut needed: HashSet<i64> = HashSet::new();
        let mut open: Vec<(usize, i64)> = Vec::new();
        for item in &self.ordered {
            let item_depth = code::depth(code::clean_code(&item.code));
            while open
                .last()
                .map(|(depth, _)| *depth >= item_depth)
                .unwrap_or(false)
            {
                open.pop();
            }
            open.push((item_depth, item.id));
            if matched.contains(&item.id) {
                needed.extend(open.iter().map(|(_, id)| *id));
            }
        }
        needed
    }

    fn matches(&self, item: &DoaItem) -> bool {
        if !self.filter.search.is_empty() {
            let needle = self.filter.search.to_lowercase();
            let haystacks = [
                Some(item.code.as_str()),
                item.title.as_deref(),
                item.description.as_deref(),
                item.comments.as_deref(),
            ];
            let hit = haystacks
                .iter()
                .flatten()
                .any(|text| text.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if !self.filter.function.is_empty() {
            let wanted = lookup::normalize_function_name(&self.filter.function);
            let actual = item
                .function_name
                .as_deref()
                .map(lookup::normalize_function_name);
            if actual.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        true
    }

    // =========================================================================
    // LINKING
    // =========================================================================

    fn link(&mut self, item: &DoaItem) {
        let node_id = NodeId::Real(item.id);
        let own = code::clean_code(&item.code);

        // Depth-1 items are roots regardless of any parent_code noise.
        if code::depth(own) <= 1 {
            self.root_ids.push(node_id);
            return;
        }

        let parent_code = match self.parent_code_for(item, own) {
            Some(parent) => parent,
            None => {
                self.root_ids.push(node_id);
                return;
            }
        };

        let parent_id = match self.resolve(&parent_code, item.sort_order) {
            Some(existing) => existing,
            None => self.synthesize_chain(&parent_code, item.sort_order),
        };
        self.children_of.entry(parent_id).or_default().push(node_id);
    }

    /// The code naming this item's intended parent: explicit when given,
    /// otherwise derived by dropping the last segment. A self-referential
    /// explicit parent is discarded and re-derived.
    fn parent_code_for(&self, item: &DoaItem, own: &str) -> Option<String> {
        match item.parent_code.as_deref().map(code::clean_code) {
            Some(explicit) if explicit == own => {
                warn!(
                    item_id = item.id,
                    code = own,
                    "self-referential parent code in source data, deriving parent instead"
                );
                code::derived_parent(own).map(str::to_string)
            }
            Some("") | None => code::derived_parent(own).map(str::to_string),
            Some(explicit) => Some(explicit.to_string()),
        }
    }

    /// Resolve the parent instance for a child at `child_sort`: the
    /// occurrence with the greatest sort_order not exceeding the child's.
    /// A parent that only appears after the child is a data anomaly; fall
    /// back to the first occurrence rather than dropping the child.
    fn resolve(&self, section_code: &str, child_sort: i64) -> Option<NodeId> {
        let occ = self.occurrences.get(section_code)?;
        let mut best = None;
        for (sort, id) in occ {
            if *sort <= child_sort {
                best = Some(*id);
            }
        }
        best.or_else(|| {
            warn!(
                code = section_code,
                child_sort, "parent appears after child in document order, using first occurrence"
            );
            occ.first().map(|(_, id)| *id)
        })
    }

    /// The parent code exists nowhere in the surviving set: scaffold
    /// placeholder ancestors along its prefix chain, shortest first, so
    /// the item stays reachable from some root. Each synthetic is created
    /// and linked at most once per build; later items resolve against it
    /// through the occurrence index.
    fn synthesize_chain(&mut self, parent_code: &str, child_sort: i64) -> NodeId {
        let mut anchor: Option<NodeId> = None;
        for ancestor in code::prefix_chain(parent_code) {
            if let Some(existing) = self.resolve(ancestor, child_sort) {
                anchor = Some(existing);
                continue;
            }

            let arena_ix = self.next_synthetic;
            self.next_synthetic += 1;
            let source = self.display_source.get(ancestor).copied();
            let node = DoaNode::synthetic(arena_ix, ancestor, source);
            let synthetic_id = node.node_id;
            debug!(code = ancestor, id = %synthetic_id, "synthesized placeholder ancestor");

            self.occurrences
                .entry(ancestor.to_string())
                .or_default()
                .push((child_sort, synthetic_id));
            self.nodes.insert(synthetic_id, node);

            match anchor {
                Some(parent_id) => self
                    .children_of
                    .entry(parent_id)
                    .or_default()
                    .push(synthetic_id),
                None => self.root_ids.push(synthetic_id),
            }
            anchor = Some(synthetic_id);
        }
        anchor.expect("prefix chain is never empty")
    }

    // =========================================================================
    // ASSEMBLY
    // =========================================================================

    fn assemble(&mut self) -> DoaForest {
        let mut roots = Vec::with_capacity(self.root_ids.len());
        let root_ids = std::mem::take(&mut self.root_ids);
        for id in root_ids {
            if let Some(root) = self.materialize(id) {
                roots.push(root);
            }
        }

        // Anything left in the arena was unreachable from every root.
        // The invariant says this cannot happen; degrade to extra roots
        // rather than dropping data if it ever does.
        let leftover: Vec<NodeId> = self.nodes.keys().copied().collect();
        for id in leftover {
            if !self.nodes.contains_key(&id) {
                continue; // consumed by an earlier leftover's subtree
            }
            warn!(id = %id, "node unreachable from any root, promoting to root");
            if let Some(orphan) = self.materialize(id) {
                roots.push(orphan);
            }
        }

        roots.sort_by(|a, b| code::numeric_cmp(&a.code, &b.code));

        let mut node_ids = HashSet::new();
        for root in &roots {
            root.collect_ids(&mut node_ids);
        }
        DoaForest { roots, node_ids }
    }

    fn materialize(&mut self, id: NodeId) -> Option<DoaNode> {
        let mut node = self.nodes.remove(&id)?;
        if let Some(child_ids) = self.children_of.remove(&id) {
            for child_id in child_ids {
                if let Some(child) = self.materialize(child_id) {
                    node.add_child(child);
                }
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApproverEntry;

    fn item(id: i64, section_code: &str, parent: Option<&str>, sort: i64) -> DoaItem {
        DoaItem {
            id,
            code: section_code.into(),
            parent_code: parent.map(String::from),
            title: Some(format!("Item {}", section_code)),
            sort_order: sort,
            ..Default::default()
        }
    }

    fn no_filter() -> BrowseFilter {
        BrowseFilter::default()
    }

    #[test]
    fn test_empty_input_yields_empty_forest() {
        let forest = build_forest(&[], &no_filter());
        assert!(forest.is_empty());
        assert!(forest.node_ids.is_empty());
    }

    #[test]
    fn test_simple_nesting() {
        let items = vec![
            item(1, "1", None, 1),
            item(2, "1.1", None, 2),
            item(3, "1.1.1", None, 3),
            item(4, "1.2", None, 4),
        ];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 1);
        let root = &forest.roots[0];
        assert_eq!(root.code, "1");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].code, "1.1");
        assert_eq!(root.children[0].children[0].code, "1.1.1");
        assert_eq!(forest.node_count(), 4);
    }

    #[test]
    fn test_duplicate_codes_resolve_by_document_proximity() {
        // Two sections share code "2"; the child at sort 2 belongs to the
        // earlier instance, not the later one.
        let items = vec![
            item(10, "2", None, 1),
            item(11, "2.1", Some("2"), 2),
            item(12, "2", None, 5),
        ];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 2);
        let first = forest.find(NodeId::Real(10)).unwrap();
        let second = forest.find(NodeId::Real(12)).unwrap();
        assert_eq!(first.children.len(), 1);
        assert_eq!(first.children[0].node_id, NodeId::Real(11));
        assert!(second.children.is_empty());
    }

    #[test]
    fn test_parent_after_child_falls_back_to_first_occurrence() {
        // The nominal parent only appears later in document order.
        let items = vec![item(1, "4.1", Some("4"), 1), item(2, "4", None, 9)];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].node_id, NodeId::Real(2));
        assert_eq!(forest.roots[0].children[0].node_id, NodeId::Real(1));
    }

    #[test]
    fn test_synthetic_ancestors_for_missing_levels() {
        let items = vec![item(1, "3.1.2", None, 1)];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 1);
        let root = &forest.roots[0];
        assert_eq!(root.code, "3");
        assert!(root.node_id.is_synthetic());
        assert_eq!(root.title.as_deref(), Some("Section 3"));

        let mid = &root.children[0];
        assert_eq!(mid.code, "3.1");
        assert!(mid.node_id.is_synthetic());

        assert_eq!(mid.children[0].node_id, NodeId::Real(1));
        // Exactly two synthetics, one real node.
        assert_eq!(forest.node_count(), 3);
    }

    #[test]
    fn test_synthetic_created_once_per_code() {
        // Both leaves need the same missing "5" and "5.1" scaffold.
        let items = vec![item(1, "5.1.1", None, 1), item(2, "5.1.2", None, 2)];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.node_count(), 4);
        let mid = forest.find_by_code("5.1").unwrap();
        assert_eq!(mid.children.len(), 2);
    }

    #[test]
    fn test_self_referential_parent_is_rederived() {
        let items = vec![item(1, "5", None, 1), item(2, "5.2", Some("5.2"), 2)];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots.len(), 1);
        assert_eq!(forest.roots[0].code, "5");
        assert_eq!(forest.roots[0].children[0].node_id, NodeId::Real(2));
    }

    #[test]
    fn test_roots_sort_numerically() {
        let items = vec![
            item(1, "10", None, 1),
            item(2, "2", None, 2),
            item(3, "1", None, 3),
        ];
        let forest = build_forest(&items, &no_filter());

        let codes: Vec<&str> = forest.roots.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_trailing_dots_are_cleaned() {
        let items = vec![item(1, "6.", None, 1), item(2, "6.1.", Some("6."), 2)];
        let forest = build_forest(&items, &no_filter());

        assert_eq!(forest.roots[0].code, "6");
        assert_eq!(forest.roots[0].children[0].code, "6.1");
    }

    #[test]
    fn test_search_filter_keeps_ancestors() {
        let items = vec![
            item(1, "1", None, 1),
            item(2, "1.1", None, 2),
            item(3, "1.1.1", None, 3),
            item(4, "2", None, 4),
        ];
        let filter = BrowseFilter::search("item 1.1.1");
        let forest = build_forest(&items, &filter);

        // The match plus its two ancestors survive; the unrelated root
        // does not.
        assert_eq!(forest.node_count(), 3);
        assert!(forest.find(NodeId::Real(4)).is_none());
        assert_eq!(forest.roots[0].code, "1");
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_text_fields() {
        let mut with_comment = item(1, "9", None, 1);
        with_comment.comments = Some("Requires BOARD sign-off".into());
        let items = vec![with_comment, item(2, "8", None, 2)];

        let forest = build_forest(&items, &BrowseFilter::search("board"));
        assert_eq!(forest.node_count(), 1);
        assert_eq!(forest.roots[0].node_id, NodeId::Real(1));
    }

    #[test]
    fn test_function_filter_normalizes_both_sides() {
        let mut finance = item(1, "1", None, 1);
        finance.function_name = Some("Finanace".into()); // known typo
        let mut hr = item(2, "2", None, 2);
        hr.function_name = Some("HR".into());
        let items = vec![finance, hr];

        let filter = BrowseFilter::function("Finance");
        let forest = build_forest(&items, &filter);
        assert_eq!(forest.node_count(), 1);
        assert_eq!(forest.roots[0].node_id, NodeId::Real(1));
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let items = vec![
            item(1, "3.1.2", None, 4),
            item(2, "2", None, 1),
            item(3, "2.1", Some("2"), 2),
            item(4, "2", None, 7),
        ];
        let first = build_forest(&items, &no_filter());
        let second = build_forest(&items, &no_filter());

        assert_eq!(first.node_ids, second.node_ids);
        assert_eq!(
            serde_json::to_value(&first.roots).unwrap(),
            serde_json::to_value(&second.roots).unwrap()
        );
    }

    #[test]
    fn test_approvers_carried_through_unmodified() {
        let mut leaf = item(1, "1.1", None, 2);
        leaf.approvers = vec![
            ApproverEntry::new("CFO", "x1"),
            ApproverEntry::new("CFO", "X1*"),
        ];
        let items = vec![item(2, "1", None, 1), leaf];
        let forest = build_forest(&items, &no_filter());

        let node = forest.find(NodeId::Real(1)).unwrap();
        // The builder keeps the raw list; normalization is the renderer's
        // per-node concern.
        assert_eq!(node.approvers.len(), 2);
        assert_eq!(node.approvers[0].action, "x1");
    }
}

//! Tree Flattening
//!
//! Turns the nested tree into the display list drag-and-drop works over.

use std::collections::HashSet;

use super::tree_lookup::collect_all_ids;
use crate::domain::Category;

/// One visible row of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode {
    pub category: Category,
    pub depth: usize,
    /// Structural parent (None = root)
    pub parent_id: Option<String>,
    /// Index among siblings
    pub index: usize,
}

/// Ids of expanded nodes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpandedSet(HashSet<String>);

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every node of the tree expanded
    pub fn all_of(categories: &[Category]) -> Self {
        Self(collect_all_ids(categories).into_iter().collect())
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.0.insert(id.into());
    }

    /// Flip membership; returns the new expanded state
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.to_string());
            true
        }
    }

    /// Forget ids that are no longer in the tree
    pub fn retain_existing(&mut self, categories: &[Category]) {
        let present: HashSet<String> = collect_all_ids(categories).into_iter().collect();
        self.0.retain(|id| present.contains(id));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pre-order DFS; children of collapsed nodes are left out entirely.
/// Returns rows in display order.
pub fn flatten_tree(categories: &[Category], expanded: &ExpandedSet) -> Vec<FlatNode> {
    fn collect(
        level: &[Category],
        depth: usize,
        parent_id: Option<&str>,
        expanded: &ExpandedSet,
        result: &mut Vec<FlatNode>,
    ) {
        for (index, category) in level.iter().enumerate() {
            result.push(FlatNode {
                category: category.clone(),
                depth,
                parent_id: parent_id.map(str::to_string),
                index,
            });
            if expanded.is_expanded(&category.id) {
                collect(&category.children, depth + 1, Some(&category.id), expanded, result);
            }
        }
    }

    let mut result = Vec::new();
    collect(categories, 0, None, expanded, &mut result);
    result
}

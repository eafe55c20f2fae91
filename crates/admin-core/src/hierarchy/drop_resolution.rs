//! Drop Resolution
//!
//! Maps "node D dropped onto node T" to a reorder or move intent.

use serde::Serialize;

use super::tree_lookup::{is_descendant, locate, siblings};
use crate::domain::Category;

/// New position of one sibling, sent to `PATCH /categories/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderItem {
    pub id: String,
    pub order: i32,
}

/// Reparent request, sent to `PATCH /categories/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveItem {
    pub id: String,
    /// New parent (None = root)
    pub parent_id: Option<String>,
    pub order: i32,
}

/// Mutation derived from a single drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    /// Same parent: the whole sibling list, renumbered 0..N-1
    Reorder(Vec<ReorderItem>),
    /// Different parent: take the target's slot under the target's parent
    Move(MoveItem),
}

/// Resolve a drop of `dragged_id` onto `target_id`.
///
/// Returns None when the drop must be ignored: dropping onto itself or onto
/// anything in its own subtree, or either node is not in the tree.
pub fn resolve_drop(categories: &[Category], dragged_id: &str, target_id: &str) -> Option<DropIntent> {
    if dragged_id == target_id {
        return None;
    }

    let dragged = locate(categories, dragged_id)?;
    let target = locate(categories, target_id)?;

    // A node may never become its own ancestor
    if is_descendant(dragged.category, target_id) {
        tracing::debug!(dragged_id, target_id, "drop into own subtree ignored");
        return None;
    }

    if dragged.parent_id == target.parent_id {
        let mut reordered: Vec<&Category> = siblings(categories, dragged.parent_id).iter().collect();
        let moved = reordered.remove(dragged.index);
        reordered.insert(target.index, moved);

        let items = reordered
            .iter()
            .enumerate()
            .map(|(order, category)| ReorderItem {
                id: category.id.clone(),
                order: order as i32,
            })
            .collect();
        Some(DropIntent::Reorder(items))
    } else {
        Some(DropIntent::Move(MoveItem {
            id: dragged_id.to_string(),
            parent_id: target.parent_id.map(str::to_string),
            order: target.index as i32,
        }))
    }
}

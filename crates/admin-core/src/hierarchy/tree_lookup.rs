//! Tree Lookup
//!
//! Node, sibling and subtree queries over the nested tree.

use crate::domain::Category;

/// Where a node sits in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLocation<'a> {
    pub category: &'a Category,
    /// Structural parent (None = root list)
    pub parent_id: Option<&'a str>,
    /// Index among its siblings
    pub index: usize,
}

/// Every id in the tree, pre-order
pub fn collect_all_ids(categories: &[Category]) -> Vec<String> {
    fn collect(categories: &[Category], ids: &mut Vec<String>) {
        for category in categories {
            ids.push(category.id.clone());
            collect(&category.children, ids);
        }
    }

    let mut ids = Vec::new();
    collect(categories, &mut ids);
    ids
}

/// Depth-first search for a node by id
pub fn find_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find_map(|category| {
        if category.id == id {
            Some(category)
        } else {
            find_category(&category.children, id)
        }
    })
}

/// Find a node together with its structural parent and sibling index
pub fn locate<'a>(categories: &'a [Category], id: &str) -> Option<NodeLocation<'a>> {
    fn search<'a>(
        level: &'a [Category],
        parent_id: Option<&'a str>,
        id: &str,
    ) -> Option<NodeLocation<'a>> {
        for (index, category) in level.iter().enumerate() {
            if category.id == id {
                return Some(NodeLocation {
                    category,
                    parent_id,
                    index,
                });
            }
            if let Some(found) = search(&category.children, Some(category.id.as_str()), id) {
                return Some(found);
            }
        }
        None
    }

    search(categories, None, id)
}

/// Children of `parent_id`, or the root list when `parent_id` is None.
/// An unknown parent has no siblings to offer.
pub fn siblings<'a>(categories: &'a [Category], parent_id: Option<&str>) -> &'a [Category] {
    match parent_id {
        None => categories,
        Some(pid) => find_category(categories, pid)
            .map(|parent| parent.children.as_slice())
            .unwrap_or(&[]),
    }
}

/// True if `target_id` is `category` itself or anywhere below it
pub fn is_descendant(category: &Category, target_id: &str) -> bool {
    category.id == target_id
        || category
            .children
            .iter()
            .any(|child| is_descendant(child, target_id))
}

//! Category Hierarchy Editor
//!
//! Pure functions over the nested category tree:
//! - tree_lookup: Finding nodes, their siblings and their subtrees
//! - flatten: Depth-first projection honoring the expanded set
//! - drop_resolution: Turning a drag-and-drop gesture into a mutation intent
//!
//! Nothing in here mutates the tree. Intents go to the categories API and the
//! tree is re-fetched afterwards.

mod drop_resolution;
mod flatten;
mod tree_lookup;

pub use drop_resolution::{resolve_drop, DropIntent, MoveItem, ReorderItem};
pub use flatten::{flatten_tree, ExpandedSet, FlatNode};
pub use tree_lookup::{collect_all_ids, find_category, is_descendant, locate, siblings, NodeLocation};

//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use admin_core::hierarchy::ExpandedSet;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Category, Session};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Category forest as last fetched from the server
    pub categories: Vec<Category>,
    /// Ids whose children are shown
    pub expanded: ExpandedSet,
    /// Set after the first tree load so later loads keep the user's collapses
    pub tree_loaded: bool,
    pub session: Session,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the tree. The first load expands everything; later loads forget
/// ids that no longer exist.
pub fn store_set_tree(store: &AppStore, tree: Vec<Category>) {
    if store.tree_loaded().get_untracked() {
        store.expanded().write().retain_existing(&tree);
    } else {
        store.expanded().set(ExpandedSet::all_of(&tree));
        store.tree_loaded().set(true);
    }
    store.categories().set(tree);
}

/// Flip one node's expansion
pub fn store_toggle_expanded(store: &AppStore, id: &str) {
    store.expanded().write().toggle(id);
}

/// Make sure a node's children are visible, e.g. after adding one
pub fn store_expand(store: &AppStore, id: &str) {
    store.expanded().write().insert(id);
}

/// Clear everything after a failed refresh. True when a signed-in user was
/// thrown out rather than a stale token failing before sign-in.
pub fn store_expire_session(store: &AppStore) -> bool {
    let was_signed_in = store.session().write().expire();
    store_clear_session(store);
    was_signed_in
}

/// Drop everything tied to the signed-in user
pub fn store_clear_session(store: &AppStore) {
    store.session().set(Session::Anonymous);
    store.categories().set(Vec::new());
    store.expanded().set(ExpandedSet::new());
    store.tree_loaded().set(false);
}

//! Category Tree View Component
//!
//! Displays categories in a tree with drag-and-drop support. Dropping a row
//! onto another row resolves to a reorder or a move; the tree is re-fetched
//! once the server has accepted it.

use leptos::prelude::*;
use leptos::task::spawn_local;

use admin_core::hierarchy::{flatten_tree, resolve_drop, FlatNode};
use leptos_dragdrop::*;

use crate::commands;
use crate::components::CategoryRow;
use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

/// Category tree view component with DnD support
#[component]
pub fn CategoryTreeView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let dnd = create_dnd_signals::<String>();
    let (saving, set_saving) = signal(false);

    bind_global_mouseup(dnd, move |dragged_id: String, target_id: String| {
        let intent = store
            .categories()
            .with_untracked(|tree| resolve_drop(tree, &dragged_id, &target_id));
        let Some(intent) = intent else {
            tracing::debug!(dragged = %dragged_id, target = %target_id, "drop ignored");
            return;
        };
        if saving.get_untracked() {
            return;
        }

        set_saving.set(true);
        spawn_local(async move {
            match commands::apply_drop(&intent).await {
                Ok(()) => ctx.reload(),
                Err(e) => ctx.notify_error(format!("Could not move category: {e}")),
            }
            set_saving.set(false);
        });
    });

    let rows = move || {
        store
            .categories()
            .with(|tree| store.expanded().with(|expanded| flatten_tree(tree, expanded)))
    };

    view! {
        <div class=move || if saving.get() { "tree-view saving" } else { "tree-view" }>
            <Show when=move || store.categories().with(|tree| tree.is_empty())>
                <p class="empty-tree">"No categories yet"</p>
            </Show>

            <For
                each=rows
                key=|node: &FlatNode| {
                    // Every field the row renders, so edits re-render it
                    (
                        node.category.id.clone(),
                        node.depth,
                        node.index,
                        node.parent_id.clone(),
                        node.category.name.clone(),
                        node.category.slug.clone(),
                        node.category.is_active,
                        node.category.children.len(),
                        node.category.products_count,
                    )
                }
                children=move |node: FlatNode| {
                    let id = node.category.id.clone();

                    let on_mousedown = make_on_mousedown(dnd, id.clone());
                    let on_mouseenter = make_on_mouseenter(dnd, id.clone());
                    let on_mouseleave = make_on_mouseleave(dnd);

                    let row_class = {
                        let id = id.clone();
                        move || {
                            let mut c = String::from("tree-item-wrapper");
                            if dnd.is_dragging(&id) { c.push_str(" dragging"); }
                            if dnd.is_over(&id) { c.push_str(" drop-target"); }
                            c
                        }
                    };

                    view! {
                        <div
                            class=row_class
                            on:mousedown=on_mousedown
                            on:mouseenter=on_mouseenter
                            on:mouseleave=on_mouseleave
                        >
                            <CategoryRow category=node.category depth=node.depth />
                        </div>
                    }
                }
            />
        </div>
    }
}

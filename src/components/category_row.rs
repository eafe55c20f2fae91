//! Category Row Component
//!
//! One category in the tree view.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::DeleteControl;
use crate::context::use_app_context;
use crate::models::{Category, FormTarget};
use crate::store::{store_expand, store_toggle_expanded, use_app_store, AppStateStoreFields};

/// Indentation per tree level
const INDENT_PX: usize = 24;

/// A single category row
#[component]
pub fn CategoryRow(category: Category, depth: usize) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let id = category.id.clone();
    let has_children = category.has_children();
    let is_active = category.is_active;
    let products = category.product_count();
    let name = category.name.clone();
    let slug = category.slug.clone();
    let indent = depth * INDENT_PX;

    let expanded = {
        let id = id.clone();
        move || store.expanded().with(|e| e.is_expanded(&id))
    };

    let toggle = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            store_toggle_expanded(&store, &id);
        }
    };

    let add_child = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            store_expand(&store, &id);
            ctx.open_form(FormTarget::Create {
                parent_id: Some(id.clone()),
            });
        }
    };

    let edit = {
        let category = category.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            ctx.open_form(FormTarget::Edit(category.clone()));
        }
    };

    let delete = {
        let id = id.clone();
        let name = name.clone();
        move |_| {
            let id = id.clone();
            let name = name.clone();
            spawn_local(async move {
                match commands::delete_category(&id).await {
                    Ok(()) => {
                        ctx.notify_success(format!("Deleted \"{name}\""));
                        ctx.reload();
                    }
                    Err(e) => ctx.notify_error(format!("Could not delete \"{name}\": {e}")),
                }
            });
        }
    };

    view! {
        <div
            class=if is_active { "category-row" } else { "category-row inactive" }
            style=format!("margin-left: {}px;", indent)
        >
            // Collapse toggle
            {if has_children {
                view! {
                    <button class="collapse-btn" on:click=toggle>
                        {move || if expanded() { "▼" } else { "▶" }}
                    </button>
                }.into_any()
            } else {
                view! { <span class="collapse-placeholder">"·"</span> }.into_any()
            }}

            <span class="category-name">{name}</span>
            <span class="category-slug">{slug}</span>
            <span class="category-count">{products}</span>
            {(!is_active).then(|| view! { <span class="badge">"hidden"</span> })}

            <button class="add-child-btn" title="Add subcategory" on:click=add_child>"+"</button>
            <button class="edit-btn" title="Edit" on:click=edit>"✎"</button>
            <DeleteControl
                on_delete=delete
                blocked_by=has_children.then_some("Remove or move the subcategories first")
            />
        </div>
    }
}

//! Category Form Component
//!
//! Create/edit panel for a single category.

use leptos::prelude::*;
use leptos::task::spawn_local;

use admin_core::hierarchy::{find_category, flatten_tree, is_descendant, ExpandedSet};

use crate::commands;
use crate::context::use_app_context;
use crate::models::{CategoryDraft, FormTarget};
use crate::store::{store_expand, use_app_store, AppStateStoreFields};

/// `(id, indented label)` for every category that may become the parent.
/// When editing, the category's own subtree is left out.
fn parent_options(store: crate::store::AppStore, editing_id: Option<&str>) -> Vec<(String, String)> {
    store.categories().with(|tree| {
        let edited = editing_id.and_then(|id| find_category(tree, id));
        flatten_tree(tree, &ExpandedSet::all_of(tree))
            .into_iter()
            .filter(|node| !edited.is_some_and(|c| is_descendant(c, &node.category.id)))
            .map(|node| {
                let label = format!("{}{}", "· ".repeat(node.depth), node.category.name);
                (node.category.id, label)
            })
            .collect()
    })
}

#[component]
pub fn CategoryForm(target: FormTarget) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let editing = match &target {
        FormTarget::Edit(category) => Some(category.clone()),
        FormTarget::Create { .. } => None,
    };
    let editing_id = editing.as_ref().map(|c| c.id.clone());
    // Edits cannot clear the parent; moving to the root is a drag onto a root row
    let root_locked = editing.as_ref().is_some_and(|c| c.parent_id.is_some());
    let title = target.title();
    let (draft, set_draft) = signal(target.draft());
    let (saving, set_saving) = signal(false);

    let options = {
        let editing_id = editing_id.clone();
        move || parent_options(store, editing_id.as_deref())
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let current: CategoryDraft = draft.get();
        if current.name.trim().is_empty() {
            ctx.notify_error("Name is required");
            return;
        }
        if editing.as_ref().is_some_and(|c| current.moves_to_root(c)) {
            ctx.notify_error("Drag the category onto a top-level row to move it to the root");
            return;
        }

        let editing_id = editing_id.clone();
        set_saving.set(true);
        spawn_local(async move {
            let result = match &editing_id {
                Some(id) => commands::update_category(id, &current).await,
                None => commands::create_category(&current).await,
            };
            set_saving.set(false);
            match result {
                Ok(saved) => {
                    if let Some(parent) = saved.parent_id.as_deref() {
                        store_expand(&store, parent);
                    }
                    ctx.notify_success(format!("Saved \"{}\"", saved.name));
                    ctx.close_form();
                    ctx.reload();
                }
                Err(e) => ctx.notify_error(format!("Could not save category: {e}")),
            }
        });
    };

    view! {
        <form class="category-form" on:submit=submit>
            <h2>{title}</h2>

            <label>
                "Name"
                <input
                    type="text"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| set_draft.update(|d| d.name = event_target_value(&ev))
                />
            </label>

            <label>
                "Slug"
                <input
                    type="text"
                    placeholder="generated from the name"
                    prop:value=move || draft.with(|d| d.slug.clone())
                    on:input=move |ev| set_draft.update(|d| d.slug = event_target_value(&ev))
                />
            </label>

            <label>
                "Parent"
                <select
                    prop:value=move || draft.with(|d| d.parent_id.clone())
                    on:change=move |ev| set_draft.update(|d| d.parent_id = event_target_value(&ev))
                >
                    <option value="" disabled=root_locked>
                        {if root_locked { "(root: drag to move here)" } else { "(root)" }}
                    </option>
                    {move || options().into_iter().map(|(id, label)| view! {
                        <option value=id>{label}</option>
                    }).collect_view()}
                </select>
            </label>

            <label>
                "Description"
                <textarea
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| set_draft.update(|d| d.description = event_target_value(&ev))
                />
            </label>

            <label>
                "Image URL"
                <input
                    type="text"
                    prop:value=move || draft.with(|d| d.image.clone())
                    on:input=move |ev| set_draft.update(|d| d.image = event_target_value(&ev))
                />
            </label>

            <label class="checkbox">
                <input
                    type="checkbox"
                    prop:checked=move || draft.with(|d| d.is_active)
                    on:change=move |ev| set_draft.update(|d| d.is_active = event_target_checked(&ev))
                />
                "Active"
            </label>

            <fieldset>
                <legend>"SEO"</legend>
                <input
                    type="text"
                    placeholder="Title"
                    prop:value=move || draft.with(|d| d.seo_title.clone())
                    on:input=move |ev| set_draft.update(|d| d.seo_title = event_target_value(&ev))
                />
                <textarea
                    placeholder="Description"
                    prop:value=move || draft.with(|d| d.seo_description.clone())
                    on:input=move |ev| set_draft.update(|d| d.seo_description = event_target_value(&ev))
                />
            </fieldset>

            <div class="form-actions">
                <button type="submit" disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
                <button type="button" class="cancel-btn" on:click=move |_| ctx.close_form()>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

//! Categories Page Component
//!
//! Header, tree and the create/edit panel.

use leptos::prelude::*;
use leptos::task::spawn_local;

use admin_core::hierarchy::collect_all_ids;

use crate::commands;
use crate::components::{CategoryForm, CategoryTreeView, LogPanel};
use crate::context::use_app_context;
use crate::models::{FormTarget, User};
use crate::store::{store_clear_session, store_set_tree, use_app_store, AppStateStoreFields};

#[component]
pub fn CategoriesPage(user: User, #[prop(into)] app_name: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    // Reload the tree on mount and whenever the trigger changes
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        tracing::debug!(trigger, "loading category tree");
        spawn_local(async move {
            match commands::fetch_category_tree().await {
                Ok(tree) => store_set_tree(&store, tree),
                Err(e) => ctx.notify_error(format!("Could not load categories: {e}")),
            }
        });
    });

    let logout = move |_| {
        spawn_local(async move {
            commands::logout().await;
            ctx.close_form();
            store_clear_session(&store);
        });
    };

    let (show_logs, set_show_logs) = signal(false);
    let log_panel = {
        let app_name = app_name.clone();
        move || show_logs.get().then(|| view! { <LogPanel app_name=app_name.clone() /> })
    };

    let total = move || store.categories().with(|tree| collect_all_ids(tree).len());

    view! {
        <div class="app-layout">
            <main class="main-content">
                <header class="page-header">
                    <h1>{app_name}</h1>
                    <span class="user-name">{user.display_name()}</span>
                    <button class="logs-btn" on:click=move |_| set_show_logs.update(|v| *v = !*v)>
                        {move || if show_logs.get() { "Hide logs" } else { "Logs" }}
                    </button>
                    <button class="logout-btn" on:click=logout>"Sign out"</button>
                </header>

                <div class="toolbar">
                    <h2>"Categories"</h2>
                    <button on:click=move |_| ctx.open_form(FormTarget::Create { parent_id: None })>
                        "Add category"
                    </button>
                </div>

                <CategoryTreeView />

                <p class="item-count">{move || format!("{} categories", total())}</p>

                {log_panel}
            </main>

            {move || ctx.form_target.get().map(|target| view! {
                <aside class="editor-column">
                    <CategoryForm target=target />
                </aside>
            })}
        </div>
    }
}

//! Shop Admin Frontend App
//!
//! Session gate: checks the stored session at start-up, then shows either
//! the login form or the categories page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use admin_core::ApiConfig;

use crate::commands;
use crate::components::{CategoriesPage, LoginForm, ToastHost};
use crate::context::AppContext;
use crate::models::Session;
use crate::store::{store_expire_session, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let store = Store::new(AppState::default());
    provide_context(store);
    let ctx = AppContext::new();
    provide_context(ctx);

    let app_name = match ApiConfig::from_env() {
        Ok(config) => {
            let app_name = config.app_name.clone();
            commands::init_client(config, move || {
                ctx.close_form();
                if store_expire_session(&store) {
                    ctx.notify_error("Session expired, please sign in again");
                }
            });

            // Resolve the stored session once at start-up
            spawn_local(async move {
                let session = commands::check_session().await;
                tracing::info!(authenticated = session.is_authenticated(), "session checked");
                store.session().set(session);
            });
            app_name
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid API configuration");
            store.session().set(Session::Anonymous);
            ctx.notify_error(format!("Invalid API configuration: {e}"));
            "Shop Admin".to_string()
        }
    };

    let page = move || match store.session().get() {
        Session::Unknown => view! { <p class="loading">"Checking session..."</p> }.into_any(),
        Session::Anonymous => view! { <LoginForm app_name=app_name.clone() /> }.into_any(),
        Session::Authenticated(user) => {
            view! { <CategoriesPage user=user app_name=app_name.clone() /> }.into_any()
        }
    };

    view! {
        {page}
        <ToastHost />
    }
}

//! Login Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::context::use_app_context;
use crate::models::Session;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn LoginForm(#[prop(into)] app_name: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (submitting, set_submitting) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get().trim().to_string();
        let password = password.get();
        if email.is_empty() || password.is_empty() {
            set_error.set(Some("Enter your email and password".to_string()));
            return;
        }

        set_error.set(None);
        set_submitting.set(true);
        spawn_local(async move {
            match commands::login(&email, &password).await {
                Ok(user) => {
                    tracing::info!(user = %user.email, role = ?user.role, "signed in");
                    set_password.set(String::new());
                    store.session().set(Session::Authenticated(user));
                    ctx.reload();
                }
                Err(message) => set_error.set(Some(message)),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="login-screen">
            <form class="login-form" on:submit=submit>
                <h1>{app_name}</h1>

                <input
                    type="email"
                    placeholder="Email"
                    autocomplete="username"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />

                {move || error.get().map(|message| view! { <p class="login-error">{message}</p> })}

                <button type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}

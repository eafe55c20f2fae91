//! Toast Component
//!
//! Stack of transient notifications. Toasts expire on their own; clicking
//! one dismisses it early.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::models::{Toast, ToastKind};

#[component]
pub fn ToastHost() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div class="toast-host">
            <For
                each=move || ctx.toasts.get()
                key=|toast: &Toast| toast.id
                children=move |toast: Toast| {
                    let class = match toast.kind {
                        ToastKind::Success => "toast success",
                        ToastKind::Error => "toast error",
                    };
                    let id = toast.id;
                    view! {
                        <div class=class on:click=move |_| ctx.dismiss_toast(id)>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

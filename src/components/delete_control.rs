//! Delete Control Component

use leptos::prelude::*;

/// Two-step delete for a category row.
///
/// `blocked_by` is the reason deleting is not allowed right now; the button
/// stays disabled and shows it as a tooltip.
#[component]
pub fn DeleteControl(
    #[prop(into)] on_delete: Callback<()>,
    blocked_by: Option<&'static str>,
) -> impl IntoView {
    let (armed, set_armed) = signal(false);

    move || {
        if armed.get() && blocked_by.is_none() {
            view! {
                <span class="delete-confirm" on:click=|ev| ev.stop_propagation()>
                    <span class="delete-confirm-text">"Delete?"</span>
                    <button
                        class="confirm-btn"
                        on:click=move |_| {
                            set_armed.set(false);
                            on_delete.run(());
                        }
                    >
                        "✓"
                    </button>
                    <button class="cancel-btn" on:click=move |_| set_armed.set(false)>"✗"</button>
                </span>
            }
            .into_any()
        } else {
            view! {
                <button
                    class="delete-btn"
                    disabled=blocked_by.is_some()
                    title=blocked_by.unwrap_or("Delete")
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_armed.set(true);
                    }
                >
                    "×"
                </button>
            }
            .into_any()
        }
    }
}

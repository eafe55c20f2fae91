//! Log Panel Component
//!
//! Recent records from the in-memory log buffer, oldest first.

use leptos::prelude::*;

/// Lines kept on screen; the buffer itself holds more
const VISIBLE_LINES: usize = 200;

fn recent_lines(app_name: &str) -> Vec<String> {
    let records = rolling_logger::recent();
    let skip = records.len().saturating_sub(VISIBLE_LINES);
    records
        .iter()
        .skip(skip)
        .map(|record| record.format_line(app_name))
        .collect()
}

#[component]
pub fn LogPanel(#[prop(into)] app_name: String) -> impl IntoView {
    let (lines, set_lines) = signal(recent_lines(&app_name));
    let app_name = StoredValue::new(app_name);

    let refresh = move |_| set_lines.set(app_name.with_value(|name| recent_lines(name)));

    view! {
        <section class="log-panel">
            <div class="log-panel-header">
                <h3>"Recent activity"</h3>
                <button on:click=refresh>"Refresh"</button>
            </div>
            <Show
                when=move || lines.with(|l| !l.is_empty())
                fallback=|| view! { <p class="empty">"Nothing logged yet"</p> }
            >
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </Show>
        </section>
    }
}

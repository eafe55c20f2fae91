//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::models::{FormTarget, Toast, ToastKind};

/// How long a toast stays up
const TOAST_TTL: Duration = Duration::from_secs(4);

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload the category tree - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload the category tree - write
    set_reload_trigger: WriteSignal<u32>,
    /// Category form target (None = form closed) - read
    pub form_target: ReadSignal<Option<FormTarget>>,
    set_form_target: WriteSignal<Option<FormTarget>>,
    /// Visible toasts - read
    pub toasts: ReadSignal<Vec<Toast>>,
    set_toasts: WriteSignal<Vec<Toast>>,
    next_toast_id: StoredValue<u32>,
}

impl AppContext {
    pub fn new() -> Self {
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        let (form_target, set_form_target) = signal(None::<FormTarget>);
        let (toasts, set_toasts) = signal(Vec::<Toast>::new());
        Self {
            reload_trigger,
            set_reload_trigger,
            form_target,
            set_form_target,
            toasts,
            set_toasts,
            next_toast_id: StoredValue::new(0),
        }
    }

    /// Trigger a reload of the tree
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn open_form(&self, target: FormTarget) {
        self.set_form_target.set(Some(target));
    }

    pub fn close_form(&self) {
        self.set_form_target.set(None);
    }

    pub fn notify_success(&self, message: impl Into<String>) {
        self.push_toast(ToastKind::Success, message.into());
    }

    pub fn notify_error(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "shown to user");
        self.push_toast(ToastKind::Error, message);
    }

    pub fn dismiss_toast(&self, id: u32) {
        self.set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    fn push_toast(&self, kind: ToastKind, message: String) {
        let id = self.next_toast_id.get_value();
        self.next_toast_id.set_value(id.wrapping_add(1));
        self.set_toasts.update(|toasts| toasts.push(Toast { id, kind, message }));

        let ctx = *self;
        spawn_local(async move {
            gloo_timers::future::sleep(TOAST_TTL).await;
            ctx.dismiss_toast(id);
        });
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

//! API Command Wrappers
//!
//! Frontend bindings to the REST backend, organized by domain. Every command
//! goes through one shared `ApiClient`, so all requests share a single token
//! refresh.

mod auth;
mod category;

use std::cell::RefCell;
use std::rc::Rc;

use admin_core::auth::SessionListener;
use admin_core::http::ApiClient;
use admin_core::{ApiConfig, ApiError};

use crate::storage::local_storage_token_store;

thread_local! {
    static CLIENT: RefCell<Option<Rc<ApiClient>>> = const { RefCell::new(None) };
}

/// Clears UI session state and sends the browser to the login entry point
struct RedirectOnExpiry {
    login_path: String,
    on_expired: Box<dyn Fn()>,
}

impl SessionListener for RedirectOnExpiry {
    fn session_expired(&self) {
        (self.on_expired)();
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(
                &wasm_bindgen::JsValue::NULL,
                "",
                Some(&self.login_path),
            );
        }
    }
}

/// Build the shared client. `on_expired` runs when a token refresh fails.
pub fn init_client(config: ApiConfig, on_expired: impl Fn() + 'static) {
    let listener = RedirectOnExpiry {
        login_path: config.login_path.clone(),
        on_expired: Box::new(on_expired),
    };
    tracing::info!(base_url = %config.base_url, "api client ready");
    let client = ApiClient::with_reqwest(config, local_storage_token_store()).with_session_listener(listener);
    CLIENT.with(|slot| *slot.borrow_mut() = Some(Rc::new(client)));
}

/// Shown instead of the raw error once the session is gone; the expiry
/// listener has already sent the user back to sign in.
const SESSION_LOST: &str = "Your session has ended, please sign in again";

fn describe(error: ApiError) -> String {
    if error.is_session_lost() {
        SESSION_LOST.to_string()
    } else {
        error.to_string()
    }
}

fn client() -> Result<Rc<ApiClient>, String> {
    CLIENT.with(|slot| slot.borrow().clone().ok_or_else(|| "API client not initialized".to_string()))
}

// Re-export all public items
pub use auth::*;
pub use category::*;

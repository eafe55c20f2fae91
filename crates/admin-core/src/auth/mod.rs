//! Auth Layer
//!
//! - token_store: Where the access/refresh tokens are kept
//! - coordinator: Single-flight refresh state machine

mod coordinator;
mod token_store;

pub use coordinator::{RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshState, RefreshTicket, RefreshWaiter};
pub use token_store::{
    KeyValueStorage, KeyValueTokenStore, MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};

/// Notified when a refresh fails and the session is torn down
pub trait SessionListener {
    fn session_expired(&self);
}

/// Listener that does nothing, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSessionListener;

impl SessionListener for NoopSessionListener {
    fn session_expired(&self) {}
}

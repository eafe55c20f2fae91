//! Browser Token Storage
//!
//! `localStorage` backend for the token pair, so a reload keeps the session.
//! Pairing and rollback live in `KeyValueTokenStore`.

use admin_core::auth::{KeyValueStorage, KeyValueTokenStore};

/// Tokens persisted in `window.localStorage`
pub type LocalStorageTokenStore = KeyValueTokenStore<LocalStorage>;

pub fn local_storage_token_store() -> LocalStorageTokenStore {
    KeyValueTokenStore::new(LocalStorage)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, String> {
        let window = web_sys::window().ok_or("no window")?;
        window
            .local_storage()
            .map_err(|e| format!("{e:?}"))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().ok()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| format!("{e:?}"))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        Self::storage()?.remove_item(key).map_err(|e| format!("{e:?}"))
    }
}

//! Token Storage
//!
//! Durable client-side storage for the token pair. Reads are synchronous and
//! happen before every outgoing request.

use std::sync::Mutex;

use crate::domain::AuthTokens;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Where the token pair lives between requests
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    /// Replace both tokens
    fn store(&self, tokens: &AuthTokens);

    /// Erase both tokens
    fn clear(&self);

    fn has_session(&self) -> bool {
        self.access_token().is_some()
    }
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn snapshot(&self) -> Option<AuthTokens> {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.snapshot().map(|t| t.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.snapshot().map(|t| t.refresh_token)
    }

    fn store(&self, tokens: &AuthTokens) {
        *self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(tokens.clone());
    }

    fn clear(&self) {
        *self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl<S: TokenStore + ?Sized> TokenStore for std::sync::Arc<S> {
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn refresh_token(&self) -> Option<String> {
        (**self).refresh_token()
    }

    fn store(&self, tokens: &AuthTokens) {
        (**self).store(tokens)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// String key/value storage such as the browser's `localStorage`
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    fn remove(&self, key: &str) -> Result<(), String>;
}

/// `TokenStore` over key/value storage.
///
/// The two keys always change together: if the refresh token cannot be
/// written, the previous access token is put back.
#[derive(Debug, Default, Clone)]
pub struct KeyValueTokenStore<B> {
    backend: B,
}

impl<B: KeyValueStorage> KeyValueTokenStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.backend.get(key).filter(|v| !v.is_empty())
    }

    fn remove_logged(&self, key: &str) -> bool {
        match self.backend.remove(key) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(key, %error, "token removal failed");
                false
            }
        }
    }
}

impl<B: KeyValueStorage> TokenStore for KeyValueTokenStore<B> {
    fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    fn store(&self, tokens: &AuthTokens) {
        let previous_access = self.backend.get(ACCESS_TOKEN_KEY);
        if let Err(error) = self.backend.set(ACCESS_TOKEN_KEY, &tokens.access_token) {
            tracing::warn!(key = ACCESS_TOKEN_KEY, %error, "token write failed, keeping previous pair");
            return;
        }
        let Err(error) = self.backend.set(REFRESH_TOKEN_KEY, &tokens.refresh_token) else {
            return;
        };

        tracing::warn!(key = REFRESH_TOKEN_KEY, %error, "token write failed, restoring previous access token");
        let restored = match previous_access {
            Some(previous) => self.backend.set(ACCESS_TOKEN_KEY, &previous),
            None => self.backend.remove(ACCESS_TOKEN_KEY),
        };
        if let Err(error) = restored {
            // Mismatched pair: drop both so the next request starts clean
            tracing::warn!(%error, "could not restore access token, clearing session");
            self.clear();
        }
    }

    fn clear(&self) {
        let access = self.remove_logged(ACCESS_TOKEN_KEY);
        let refresh = self.remove_logged(REFRESH_TOKEN_KEY);
        if !(access && refresh) {
            tracing::warn!(access_removed = access, refresh_removed = refresh, "session only partly cleared");
        }
    }
}

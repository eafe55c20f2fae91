//! Auth Commands
//!
//! Frontend bindings for login, logout and the start-up session check.

use admin_core::api::AuthApi;
use admin_core::domain::{Session, User};
use admin_core::ApiError;

use super::client;

const LOGIN_FAILED: &str = "Invalid email or password";

/// Sign in. The server's own message is shown when it sends one.
pub async fn login(email: &str, password: &str) -> Result<User, String> {
    let client = client()?;
    AuthApi::new(&client)
        .login(email, password)
        .await
        .map_err(|e| match e {
            ApiError::Status { message, .. } if !message.is_empty() => message,
            ApiError::Transport(detail) => detail,
            _ => LOGIN_FAILED.to_string(),
        })
}

pub async fn logout() {
    if let Ok(client) = client() {
        AuthApi::new(&client).logout().await;
    }
}

pub async fn check_session() -> Session {
    match client() {
        Ok(client) => AuthApi::new(&client).check_session().await,
        Err(_) => Session::Anonymous,
    }
}

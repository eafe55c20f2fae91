//! Auth API
//!
//! Login, logout and session checks. Token refresh is not here: the client
//! does it on its own when a request comes back 401.

use serde::Serialize;

use crate::domain::{LoginResponse, Session, User};
use crate::error::Result;
use crate::http::{ApiClient, ApiRequest};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct VerifyEmailRequest<'a> {
    token: &'a str,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Sign in and persist the issued tokens
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest { email, password })?;
        let response: LoginResponse = self.client.send_json(request).await?;
        self.client.tokens().store(&response.tokens());
        tracing::info!(user = %response.user.email, "signed in");
        Ok(response.user)
    }

    /// Sign out. Server errors are ignored; local tokens are always erased.
    pub async fn logout(&self) {
        if let Err(err) = self.client.send_empty(ApiRequest::post("/auth/logout")).await {
            tracing::debug!(error = %err, "logout request failed");
        }
        self.client.tokens().clear();
    }

    pub async fn me(&self) -> Result<User> {
        self.client.send_json(ApiRequest::get("/auth/me")).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        let request = ApiRequest::post("/auth/verify-email").json(&VerifyEmailRequest { token })?;
        self.client.send_empty(request).await
    }

    /// Work out the session at start-up.
    ///
    /// No stored token means anonymous; a stored token that `/auth/me`
    /// refuses is erased.
    pub async fn check_session(&self) -> Session {
        if !self.client.tokens().has_session() {
            return Session::Anonymous;
        }

        match self.me().await {
            Ok(user) => Session::Authenticated(user),
            Err(err) => {
                tracing::info!(error = %err, "stored session rejected");
                self.client.tokens().clear();
                Session::Anonymous
            }
        }
    }
}

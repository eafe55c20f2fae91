//! User and Session Entities

use serde::{Deserialize, Serialize};

/// Access/refresh token pair issued by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Manager,
    Admin,
}

/// Signed-in back-office user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Body returned by `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl LoginResponse {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// What the UI knows about the current session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    /// Start-up check still running
    #[default]
    Unknown,
    Anonymous,
    Authenticated(User),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Drop to `Anonymous` after a failed refresh. Returns whether a signed-in
    /// user was actually thrown out, as opposed to a stale token failing at
    /// start-up or on the login screen.
    pub fn expire(&mut self) -> bool {
        let was_signed_in = self.is_authenticated();
        *self = Session::Anonymous;
        was_signed_in
    }
}

//! Shop Admin Core
//!
//! Layered library behind the admin panel front end:
//! - domain: Entities exchanged with the REST API
//! - hierarchy: Category tree flattening and drag-and-drop drop resolution
//! - auth: Token storage and the single-flight refresh coordinator
//! - http: Transport seam and the token-attaching API client
//! - api: Per-resource wrappers (categories, auth)

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod hierarchy;
pub mod http;

pub use config::ApiConfig;
pub use error::{ApiError, AuthError, Result};

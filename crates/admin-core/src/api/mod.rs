//! API Wrappers
//!
//! Typed endpoints over `ApiClient`, organized by resource.

mod auth;
mod categories;

pub use auth::AuthApi;
pub use categories::CategoriesApi;

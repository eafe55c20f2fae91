//! Domain Layer
//!
//! Entities exchanged with the REST API. Only serde and chrono here.

mod category;
mod user;

pub use category::{Category, CategoryDraft, CategoryPayload, CategorySeo};
pub use user::{AuthTokens, LoginResponse, Session, User, UserRole};

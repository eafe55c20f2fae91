//! Category Commands
//!
//! Frontend bindings for the categories endpoints.

use admin_core::api::CategoriesApi;
use admin_core::domain::{Category, CategoryDraft};
use admin_core::hierarchy::DropIntent;

use super::{client, describe};

pub async fn fetch_category_tree() -> Result<Vec<Category>, String> {
    let client = client()?;
    CategoriesApi::new(&client).tree().await.map_err(describe)
}

pub async fn create_category(draft: &CategoryDraft) -> Result<Category, String> {
    let client = client()?;
    CategoriesApi::new(&client).create(draft).await.map_err(describe)
}

pub async fn update_category(id: &str, draft: &CategoryDraft) -> Result<Category, String> {
    let client = client()?;
    CategoriesApi::new(&client).update(id, draft).await.map_err(describe)
}

pub async fn delete_category(id: &str) -> Result<(), String> {
    let client = client()?;
    CategoriesApi::new(&client).delete(id).await.map_err(describe)
}

/// Persist a resolved drop (reorder or move)
pub async fn apply_drop(intent: &DropIntent) -> Result<(), String> {
    let client = client()?;
    CategoriesApi::new(&client).apply(intent).await.map_err(describe)
}

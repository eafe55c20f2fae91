//! Frontend Models
//!
//! Wire types live in `admin-core`; the UI adds the few types that only
//! exist on screen.

pub use admin_core::domain::{Category, CategoryDraft, Session, User};

/// What the category form is working on
#[derive(Clone, Debug, PartialEq)]
pub enum FormTarget {
    /// New category under the given parent (None = root)
    Create { parent_id: Option<String> },
    /// Existing category
    Edit(Category),
}

impl FormTarget {
    pub fn draft(&self) -> CategoryDraft {
        match self {
            FormTarget::Create { parent_id } => CategoryDraft::child_of(parent_id.clone()),
            FormTarget::Edit(category) => CategoryDraft::from_category(category),
        }
    }

    pub fn title(&self) -> String {
        match self {
            FormTarget::Create { parent_id: None } => "New category".to_string(),
            FormTarget::Create { parent_id: Some(_) } => "New subcategory".to_string(),
            FormTarget::Edit(category) => format!("Edit \"{}\"", category.name),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

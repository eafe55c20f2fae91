//! Category Entity
//!
//! Categories form a forest. `children` is what the tree is rendered from;
//! `parent_id` is what mutations change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SEO metadata attached to a category page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategorySeo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A node of the category tree as returned by `GET /categories/tree`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Parent category (None = root)
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Sort position among siblings
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub seo: Option<CategorySeo>,
    /// Nested children, already sorted by the server
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
    #[serde(default)]
    pub products_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: String::new(),
            description: None,
            image: None,
            parent_id: None,
            order: 0,
            is_active: true,
            seo: None,
            children: Vec::new(),
            products_count: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Attach children, setting their `parent_id` to this node
    pub fn with_children(mut self, children: Vec<Category>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(self.id.clone());
                child
            })
            .collect();
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Products currently assigned, treating unknown as zero
    pub fn product_count(&self) -> u32 {
        self.products_count.unwrap_or(0)
    }
}

/// Editable fields of a category, as collected by the category form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub parent_id: String,
    pub is_active: bool,
    pub seo_title: String,
    pub seo_description: String,
}

impl CategoryDraft {
    /// Prefill the form from an existing category
    pub fn from_category(category: &Category) -> Self {
        let seo = category.seo.clone().unwrap_or_default();
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone().unwrap_or_default(),
            image: category.image.clone().unwrap_or_default(),
            parent_id: category.parent_id.clone().unwrap_or_default(),
            is_active: category.is_active,
            seo_title: seo.title,
            seo_description: seo.description,
        }
    }

    /// Empty draft for a new child of `parent_id`
    pub fn child_of(parent_id: Option<String>) -> Self {
        Self {
            parent_id: parent_id.unwrap_or_default(),
            is_active: true,
            ..Default::default()
        }
    }

    /// Map to the request body: blank strings are dropped, SEO is only sent
    /// when a title is present.
    pub fn to_payload(&self) -> CategoryPayload {
        CategoryPayload {
            name: self.name.trim().to_string(),
            slug: non_empty(&self.slug),
            description: non_empty(&self.description),
            image: non_empty(&self.image),
            parent_id: non_empty(&self.parent_id),
            is_active: Some(self.is_active),
            seo: non_empty(&self.seo_title).map(|title| CategorySeo {
                title,
                description: self.seo_description.trim().to_string(),
                keywords: Vec::new(),
            }),
        }
    }
}

impl CategoryDraft {
    /// True when the draft would take a nested `previous` back to the root.
    /// A blank parent is left out of the update body, so the server would
    /// keep the old parent.
    pub fn moves_to_root(&self, previous: &Category) -> bool {
        previous.parent_id.is_some() && non_empty(&self.parent_id).is_none()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Request body for `POST /categories` and `PATCH /categories/:id`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo: Option<CategorySeo>,
}

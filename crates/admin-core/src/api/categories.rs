//! Categories API
//!
//! CRUD plus the two mutations the hierarchy editor emits.

use serde::Serialize;

use crate::domain::{Category, CategoryDraft};
use crate::error::Result;
use crate::hierarchy::{DropIntent, MoveItem, ReorderItem};
use crate::http::{ApiClient, ApiRequest};

#[derive(Serialize)]
struct ReorderBody<'a> {
    items: &'a [ReorderItem],
}

/// `parentId` is omitted, not null, when moving to the root
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    order: i32,
}

pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoriesApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Full nested tree, children sorted by the server
    pub async fn tree(&self) -> Result<Vec<Category>> {
        self.client.send_json(ApiRequest::get("/categories/tree")).await
    }

    /// Flat list of every category
    pub async fn list(&self) -> Result<Vec<Category>> {
        self.client.send_json(ApiRequest::get("/categories")).await
    }

    pub async fn get(&self, id: &str) -> Result<Category> {
        self.client.send_json(ApiRequest::get(format!("/categories/{id}"))).await
    }

    pub async fn create(&self, draft: &CategoryDraft) -> Result<Category> {
        let request = ApiRequest::post("/categories").json(&draft.to_payload())?;
        self.client.send_json(request).await
    }

    pub async fn update(&self, id: &str, draft: &CategoryDraft) -> Result<Category> {
        let request = ApiRequest::patch(format!("/categories/{id}")).json(&draft.to_payload())?;
        self.client.send_json(request).await
    }

    /// Delete a category. Callers only offer this for childless nodes.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.send_empty(ApiRequest::delete(format!("/categories/{id}"))).await
    }

    /// Batch sibling renumbering
    pub async fn reorder(&self, items: &[ReorderItem]) -> Result<()> {
        let request = ApiRequest::patch("/categories/reorder").json(&ReorderBody { items })?;
        self.client.send_empty(request).await
    }

    /// Reparent one node into the given slot
    pub async fn move_category(&self, item: &MoveItem) -> Result<()> {
        let body = MoveBody {
            parent_id: item.parent_id.as_deref(),
            order: item.order,
        };
        let request = ApiRequest::patch(format!("/categories/{}", item.id)).json(&body)?;
        self.client.send_empty(request).await
    }

    /// Persist whatever a drop resolved to
    pub async fn apply(&self, intent: &DropIntent) -> Result<()> {
        match intent {
            DropIntent::Reorder(items) => {
                tracing::info!(siblings = items.len(), "reordering categories");
                self.reorder(items).await
            }
            DropIntent::Move(item) => {
                tracing::info!(id = %item.id, parent = ?item.parent_id, order = item.order, "moving category");
                self.move_category(item).await
            }
        }
    }
}

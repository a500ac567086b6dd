// Product - second level of the catalog hierarchy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::ParentRef;

/// A product belongs to exactly one category. The category reference may
/// arrive as a bare id or as an expanded object; see `ParentRef`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name (e.g., "Fruit")
    pub name: String,

    /// Owning category, raw id or expanded object
    pub category_id: ParentRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a new product under the given category.
    pub fn new(name: impl Into<String>, category_id: impl Into<ParentRef>) -> Self {
        let now = Utc::now();
        Product {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            category_id: category_id.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Bare id of the owning category, whichever shape the reference is in.
    pub fn category_key(&self) -> &str {
        self.category_id.id()
    }
}

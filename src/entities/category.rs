// Category - root of the catalog hierarchy
//
// Category → Product → Brand → Sale. A category only carries a name;
// everything interesting hangs off it through product.category_id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root catalog entity. Products reference it via `category_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name (e.g., "Food")
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Create a new category with a fresh UUID and timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Category {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_creation() {
        let category = Category::new("Food");

        assert!(!category.id.is_empty());
        assert_eq!(category.name, "Food");
        assert!(category.created_at.is_some());
    }

    #[test]
    fn test_category_serializes_camel_case() {
        let category = Category::new("Food");
        let json = serde_json::to_value(&category).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_category_deserializes_without_timestamps() {
        let category: Category =
            serde_json::from_value(serde_json::json!({"id": "c-1", "name": "Food"})).unwrap();

        assert_eq!(category.id, "c-1");
        assert!(category.created_at.is_none());
    }
}

// Brand - third level of the catalog hierarchy, the level sales hang off

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::ParentRef;

/// A brand belongs to exactly one product. Sales reference brands, so the
/// brand id set is what every filter ultimately resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Display name (e.g., "Fruits1")
    pub name: String,

    /// Owning product, raw id or expanded object
    pub product_id: ParentRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Brand {
    /// Create a new brand under the given product.
    pub fn new(name: impl Into<String>, product_id: impl Into<ParentRef>) -> Self {
        let now = Utc::now();
        Brand {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            product_id: product_id.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Bare id of the owning product, whichever shape the reference is in.
    pub fn product_key(&self) -> &str {
        self.product_id.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_creation() {
        let brand = Brand::new("Fruits1", "p-1");

        assert!(!brand.id.is_empty());
        assert_eq!(brand.name, "Fruits1");
        assert_eq!(brand.product_key(), "p-1");
    }

    #[test]
    fn test_brand_with_expanded_product() {
        let brand: Brand = serde_json::from_value(serde_json::json!({
            "id": "b-1",
            "name": "Fruits1",
            "productId": {"id": "p-1", "name": "Fruit", "categoryId": "cat-1"},
        }))
        .unwrap();

        assert_eq!(brand.product_key(), "p-1");
    }
}

// Sale - one monthly sales figure for one brand
//
// (brand, month, year) is NOT unique: duplicate rows are legal data and
// aggregation sums them rather than overwriting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::ParentRef;

/// One monthly sales value for a brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Stable identity (UUID) - never changes
    pub id: String,

    /// Brand this figure belongs to, raw id or expanded object
    pub brand_id: ParentRef,

    /// Calendar month, 1..=12
    pub month: u8,

    /// Calendar year (e.g., 2026)
    pub year: i32,

    /// Monetary amount, never negative
    pub value: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Create a new sale record.
    pub fn new(brand_id: impl Into<ParentRef>, month: u8, year: i32, value: f64) -> Self {
        let now = Utc::now();
        Sale {
            id: uuid::Uuid::new_v4().to_string(),
            brand_id: brand_id.into(),
            month,
            year,
            value,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Bare id of the brand, whichever shape the reference is in.
    pub fn brand_key(&self) -> &str {
        self.brand_id.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_creation() {
        let sale = Sale::new("b-1", 1, 2026, 120.0);

        assert!(!sale.id.is_empty());
        assert_eq!(sale.brand_key(), "b-1");
        assert_eq!(sale.month, 1);
        assert_eq!(sale.year, 2026);
        assert_eq!(sale.value, 120.0);
    }

    #[test]
    fn test_sale_with_expanded_brand() {
        let sale: Sale = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "brandId": {"id": "b-1", "name": "Fruits1", "productId": "p-1"},
            "month": 2,
            "year": 2026,
            "value": 140.5,
        }))
        .unwrap();

        assert_eq!(sale.brand_key(), "b-1");
        assert_eq!(sale.value, 140.5);
    }
}

// Polymorphic parent reference
//
// The API layer may hand records over with foreign keys in two shapes:
// a bare identifier string, or an already-expanded (populated) parent
// record carrying its own `id`. Every comparison against a parent key
// goes through `ParentRef::id()` so both shapes behave identically.

use serde::{Deserialize, Serialize};

/// A foreign-key reference that is either a raw id or an embedded record.
///
/// Serialized form is untagged: a JSON string deserializes to `Id`, a JSON
/// object with an `id` field deserializes to `Embedded`. Extra fields on
/// the embedded record (name, its own parent key, timestamps) are kept as
/// raw JSON so expanded payloads round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    /// Bare identifier, e.g. `"b-42"`.
    Id(String),

    /// Expanded parent record, e.g. `{"id": "b-42", "name": "Fruits1", ...}`.
    Embedded(EmbeddedParent),
}

/// The expanded shape of a parent reference: the id plus whatever other
/// fields the record carried, kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedParent {
    pub id: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

impl ParentRef {
    /// Extract the bare identifier, whichever shape this reference is in.
    pub fn id(&self) -> &str {
        match self {
            ParentRef::Id(id) => id,
            ParentRef::Embedded(parent) => &parent.id,
        }
    }

    /// True when this reference points at `other`.
    pub fn is(&self, other: &str) -> bool {
        self.id() == other
    }
}

impl From<&str> for ParentRef {
    fn from(id: &str) -> Self {
        ParentRef::Id(id.to_string())
    }
}

impl From<String> for ParentRef {
    fn from(id: String) -> Self {
        ParentRef::Id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_id_extraction() {
        let r = ParentRef::from("cat-1");
        assert_eq!(r.id(), "cat-1");
        assert!(r.is("cat-1"));
        assert!(!r.is("cat-2"));
    }

    #[test]
    fn test_embedded_extraction() {
        let r: ParentRef = serde_json::from_value(serde_json::json!({
            "id": "cat-1",
            "name": "Food",
        }))
        .unwrap();

        assert_eq!(r.id(), "cat-1");
        match &r {
            ParentRef::Embedded(parent) => {
                assert_eq!(parent.rest.get("name").unwrap(), "Food");
            }
            other => panic!("expected embedded reference, got {:?}", other),
        }
    }

    #[test]
    fn test_string_deserializes_to_raw_id() {
        let r: ParentRef = serde_json::from_value(serde_json::json!("cat-1")).unwrap();
        assert_eq!(r, ParentRef::Id("cat-1".to_string()));
    }

    #[test]
    fn test_raw_and_embedded_compare_equal_by_id() {
        let raw = ParentRef::from("b-7");
        let embedded: ParentRef =
            serde_json::from_value(serde_json::json!({"id": "b-7", "name": "Brand 7"})).unwrap();

        assert_eq!(raw.id(), embedded.id());
    }
}

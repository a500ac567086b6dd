// Hierarchy Resolver - cascading filter scope
//
// Given a selection anchored at any level of Category → Product → Brand,
// compute the exact set of brand ids whose sales are "in view". This is
// the one place the hierarchy is walked; everything downstream works on
// flat brand-id sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entities::{Brand, Category, Product};

/// The single selected entity driving the filter, or no selection.
///
/// At most one anchor is in effect at a time; selecting deeper in the
/// hierarchy replaces the shallower selection (see `state::reduce`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Anchor {
    /// No selection: report over every brand.
    None,
    /// Selected category: all brands under all of its products.
    Category(String),
    /// Selected product: all brands under it.
    Product(String),
    /// Selected brand: just that brand.
    Brand(String),
}

/// Resolved filter scope.
///
/// `Unfiltered` and `Brands(empty set)` are distinct on purpose: the first
/// means "no filter, keep everything", the second means "filtered down to
/// nothing" (e.g. a stale anchor or a childless category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BrandScope {
    Unfiltered,
    Brands(HashSet<String>),
}

impl BrandScope {
    /// True when the given brand id is inside this scope.
    pub fn contains(&self, brand_id: &str) -> bool {
        match self {
            BrandScope::Unfiltered => true,
            BrandScope::Brands(ids) => ids.contains(brand_id),
        }
    }

    /// Number of brands in scope, or `None` when unfiltered.
    pub fn len(&self) -> Option<usize> {
        match self {
            BrandScope::Unfiltered => None,
            BrandScope::Brands(ids) => Some(ids.len()),
        }
    }

    /// True only for an explicitly empty brand set.
    pub fn is_empty(&self) -> bool {
        matches!(self, BrandScope::Brands(ids) if ids.is_empty())
    }
}

/// The catalog collections currently available for resolution.
///
/// May be a complete snapshot (eager load) or a scoped subset (deferred
/// load); resolution only ever looks at what it is handed and never
/// assumes completeness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub brands: Vec<Brand>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, products: Vec<Product>, brands: Vec<Brand>) -> Self {
        Catalog {
            categories,
            products,
            brands,
        }
    }

    /// Combined entity count, the input to the load-strategy threshold.
    pub fn entity_count(&self) -> usize {
        self.categories.len() + self.products.len() + self.brands.len()
    }
}

/// Resolve an anchor to the set of brand ids in scope.
///
/// A brand anchor needs no traversal and resolves to itself even when the
/// brand is missing from the catalog. Product and category anchors walk
/// one and two levels of parent keys respectively; an anchor with no
/// matching rows (stale selection, partial catalog) resolves to the empty
/// set rather than an error. Parent keys are normalized through
/// `ParentRef::id()`, so raw-id and expanded records resolve identically.
pub fn resolve_brand_scope(anchor: &Anchor, catalog: &Catalog) -> BrandScope {
    match anchor {
        Anchor::None => BrandScope::Unfiltered,

        Anchor::Brand(id) => {
            let mut ids = HashSet::new();
            ids.insert(id.clone());
            BrandScope::Brands(ids)
        }

        Anchor::Product(id) => {
            let ids = catalog
                .brands
                .iter()
                .filter(|brand| brand.product_id.is(id))
                .map(|brand| brand.id.clone())
                .collect();
            BrandScope::Brands(ids)
        }

        Anchor::Category(id) => {
            let product_ids: HashSet<&str> = catalog
                .products
                .iter()
                .filter(|product| product.category_id.is(id))
                .map(|product| product.id.as_str())
                .collect();

            let ids = catalog
                .brands
                .iter()
                .filter(|brand| product_ids.contains(brand.product_key()))
                .map(|brand| brand.id.clone())
                .collect();
            BrandScope::Brands(ids)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn fixed_product(id: &str, name: &str, category_id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category_id: category_id.into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn fixed_brand(id: &str, name: &str, product_id: &str) -> Brand {
        Brand {
            id: id.to_string(),
            name: name.to_string(),
            product_id: product_id.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Category "Food" → Product "Fruit" → Brands "Fruits1", "Fruits2".
    fn food_catalog() -> Catalog {
        Catalog::new(
            vec![fixed_category("food", "Food")],
            vec![fixed_product("fruit", "Fruit", "food")],
            vec![
                fixed_brand("fruits1", "Fruits1", "fruit"),
                fixed_brand("fruits2", "Fruits2", "fruit"),
            ],
        )
    }

    fn brand_set(ids: &[&str]) -> BrandScope {
        BrandScope::Brands(ids.iter().map(|id| id.to_string()).collect())
    }

    #[test]
    fn test_no_anchor_is_unfiltered() {
        let scope = resolve_brand_scope(&Anchor::None, &food_catalog());

        assert_eq!(scope, BrandScope::Unfiltered);
        assert!(scope.contains("anything"));
        assert!(!scope.is_empty());
    }

    #[test]
    fn test_brand_anchor_resolves_to_itself() {
        let scope = resolve_brand_scope(&Anchor::Brand("fruits1".into()), &food_catalog());
        assert_eq!(scope, brand_set(&["fruits1"]));

        // No traversal: resolution ignores catalog contents entirely.
        let scope = resolve_brand_scope(&Anchor::Brand("ghost".into()), &Catalog::default());
        assert_eq!(scope, brand_set(&["ghost"]));
    }

    #[test]
    fn test_product_anchor_collects_its_brands() {
        let scope = resolve_brand_scope(&Anchor::Product("fruit".into()), &food_catalog());
        assert_eq!(scope, brand_set(&["fruits1", "fruits2"]));
    }

    #[test]
    fn test_category_anchor_collects_descendant_brands() {
        let scope = resolve_brand_scope(&Anchor::Category("food".into()), &food_catalog());
        assert_eq!(scope, brand_set(&["fruits1", "fruits2"]));
    }

    #[test]
    fn test_category_anchor_skips_other_branches() {
        let mut catalog = food_catalog();
        catalog.categories.push(fixed_category("drink", "Drink"));
        catalog.products.push(fixed_product("soda", "Soda", "drink"));
        catalog.brands.push(fixed_brand("soda1", "Soda1", "soda"));

        let scope = resolve_brand_scope(&Anchor::Category("food".into()), &catalog);
        assert_eq!(scope, brand_set(&["fruits1", "fruits2"]));

        let scope = resolve_brand_scope(&Anchor::Category("drink".into()), &catalog);
        assert_eq!(scope, brand_set(&["soda1"]));
    }

    #[test]
    fn test_stale_anchor_resolves_to_empty_set() {
        let scope = resolve_brand_scope(&Anchor::Category("deleted".into()), &food_catalog());
        assert_eq!(scope, brand_set(&[]));
        assert!(scope.is_empty());

        let scope = resolve_brand_scope(&Anchor::Product("deleted".into()), &food_catalog());
        assert!(scope.is_empty());
    }

    #[test]
    fn test_category_with_no_products_resolves_to_empty_set() {
        let mut catalog = food_catalog();
        catalog.categories.push(fixed_category("empty", "Empty"));

        let scope = resolve_brand_scope(&Anchor::Category("empty".into()), &catalog);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_empty_set_is_not_unfiltered() {
        let empty = brand_set(&[]);

        assert!(empty.is_empty());
        assert!(!empty.contains("fruits1"));
        assert_ne!(empty, BrandScope::Unfiltered);
        assert_eq!(empty.len(), Some(0));
        assert_eq!(BrandScope::Unfiltered.len(), None);
    }

    #[test]
    fn test_expanded_references_resolve_like_raw_ids() {
        // Same catalog, but with parent keys as populated objects.
        let expanded = Catalog::new(
            vec![fixed_category("food", "Food")],
            vec![serde_json::from_value(serde_json::json!({
                "id": "fruit",
                "name": "Fruit",
                "categoryId": {"id": "food", "name": "Food"},
            }))
            .unwrap()],
            vec![
                serde_json::from_value(serde_json::json!({
                    "id": "fruits1",
                    "name": "Fruits1",
                    "productId": {"id": "fruit", "name": "Fruit", "categoryId": "food"},
                }))
                .unwrap(),
                fixed_brand("fruits2", "Fruits2", "fruit"),
            ],
        );

        for anchor in [
            Anchor::Category("food".into()),
            Anchor::Product("fruit".into()),
        ] {
            assert_eq!(
                resolve_brand_scope(&anchor, &expanded),
                resolve_brand_scope(&anchor, &food_catalog()),
            );
        }
    }

    #[test]
    fn test_partial_catalog_is_not_an_error() {
        // Deferred load: only categories present, no products or brands.
        let partial = Catalog::new(vec![fixed_category("food", "Food")], vec![], vec![]);

        let scope = resolve_brand_scope(&Anchor::Category("food".into()), &partial);
        assert!(scope.is_empty());
    }
}

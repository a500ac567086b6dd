// Dashboard state - explicit selection state plus a pure transition
//
// The surrounding UI holds one selection per hierarchy level plus the
// loaded collections. State lives in an explicit immutable struct and
// changes only through `reduce`, which consumes the old state and an
// action and returns the next state. Selecting a category clears the
// product and brand selections; selecting a product clears the brand;
// selecting a brand stands alone.

use serde::{Deserialize, Serialize};

use crate::entities::{Brand, Category, Product, Sale};
use crate::scope::{Anchor, Catalog};

/// Combined Category+Product+Brand count at or below which everything is
/// loaded eagerly up front.
pub const EAGER_LOAD_THRESHOLD: usize = 100;

/// How the surrounding system fetches catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStrategy {
    /// Small catalog: load categories, products, brands and sales up front.
    Eager,
    /// Large catalog: load only categories and sales, defer the rest.
    Deferred,
}

impl LoadStrategy {
    /// Pick a strategy from the combined entity count.
    pub fn choose(entity_count: usize) -> Self {
        if entity_count <= EAGER_LOAD_THRESHOLD {
            LoadStrategy::Eager
        } else {
            LoadStrategy::Deferred
        }
    }
}

/// Everything the dashboard knows: loaded collections, the current
/// selections, and load/error status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub brands: Vec<Brand>,
    pub sales: Vec<Sale>,
    pub selected_category: Option<String>,
    pub selected_product: Option<String>,
    pub selected_brand: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

/// State transitions. Selection actions carry `None` to clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    SetCategories(Vec<Category>),
    SetProducts(Vec<Product>),
    SetBrands(Vec<Brand>),
    SetSales(Vec<Sale>),
    SelectCategory(Option<String>),
    SelectProduct(Option<String>),
    SelectBrand(Option<String>),
    SetLoading(bool),
    SetError(Option<String>),
    AddCategory(Category),
    UpdateCategory(Category),
    DeleteCategory(String),
    AddProduct(Product),
    UpdateProduct(Product),
    DeleteProduct(String),
    AddBrand(Brand),
    UpdateBrand(Brand),
    DeleteBrand(String),
    AddSale(Sale),
    UpdateSale(Sale),
    DeleteSale(String),
}

impl DashboardState {
    /// The catalog view of the loaded collections.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(
            self.categories.clone(),
            self.products.clone(),
            self.brands.clone(),
        )
    }

    /// The single anchor driving the filter. The deepest selection wins:
    /// brand over product over category. A shallower selection kept for
    /// display (the ancestor of a selected brand) never filters.
    pub fn effective_anchor(&self) -> Anchor {
        if let Some(id) = &self.selected_brand {
            Anchor::Brand(id.clone())
        } else if let Some(id) = &self.selected_product {
            Anchor::Product(id.clone())
        } else if let Some(id) = &self.selected_category {
            Anchor::Category(id.clone())
        } else {
            Anchor::None
        }
    }
}

fn replace_by_id<T, F>(items: Vec<T>, replacement: T, id_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let target = id_of(&replacement).to_string();
    items
        .into_iter()
        .map(|item| {
            if id_of(&item) == target {
                replacement.clone()
            } else {
                item
            }
        })
        .collect()
}

/// Pure transition function: consume the old state and an action, return
/// the next state. Never mutates in place and never fails.
pub fn reduce(state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::SetCategories(categories) => DashboardState {
            categories,
            ..state
        },
        Action::SetProducts(products) => DashboardState { products, ..state },
        Action::SetBrands(brands) => DashboardState { brands, ..state },
        Action::SetSales(sales) => DashboardState { sales, ..state },

        // Cascade: a category selection invalidates deeper selections.
        Action::SelectCategory(id) => DashboardState {
            selected_category: id,
            selected_product: None,
            selected_brand: None,
            ..state
        },
        Action::SelectProduct(id) => DashboardState {
            selected_product: id,
            selected_brand: None,
            ..state
        },
        Action::SelectBrand(id) => DashboardState {
            selected_brand: id,
            ..state
        },

        Action::SetLoading(loading) => DashboardState { loading, ..state },
        Action::SetError(error) => DashboardState {
            error,
            loading: false,
            ..state
        },

        Action::AddCategory(category) => {
            let mut categories = state.categories.clone();
            categories.push(category);
            DashboardState {
                categories,
                ..state
            }
        }
        Action::UpdateCategory(category) => DashboardState {
            categories: replace_by_id(state.categories.clone(), category, |c| c.id.as_str()),
            ..state
        },
        Action::DeleteCategory(id) => DashboardState {
            categories: state
                .categories
                .iter()
                .filter(|c| c.id != id)
                .cloned()
                .collect(),
            ..state
        },

        Action::AddProduct(product) => {
            let mut products = state.products.clone();
            products.push(product);
            DashboardState { products, ..state }
        }
        Action::UpdateProduct(product) => DashboardState {
            products: replace_by_id(state.products.clone(), product, |p| p.id.as_str()),
            ..state
        },
        Action::DeleteProduct(id) => DashboardState {
            products: state
                .products
                .iter()
                .filter(|p| p.id != id)
                .cloned()
                .collect(),
            ..state
        },

        Action::AddBrand(brand) => {
            let mut brands = state.brands.clone();
            brands.push(brand);
            DashboardState { brands, ..state }
        }
        Action::UpdateBrand(brand) => DashboardState {
            brands: replace_by_id(state.brands.clone(), brand, |b| b.id.as_str()),
            ..state
        },
        Action::DeleteBrand(id) => DashboardState {
            brands: state
                .brands
                .iter()
                .filter(|b| b.id != id)
                .cloned()
                .collect(),
            ..state
        },

        Action::AddSale(sale) => {
            let mut sales = state.sales.clone();
            sales.push(sale);
            DashboardState { sales, ..state }
        }
        Action::UpdateSale(sale) => DashboardState {
            sales: replace_by_id(state.sales.clone(), sale, |s| s.id.as_str()),
            ..state
        },
        Action::DeleteSale(id) => DashboardState {
            sales: state.sales.iter().filter(|s| s.id != id).cloned().collect(),
            ..state
        },
    }
}

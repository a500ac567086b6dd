// Sales Report - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod entities;
pub mod report;
pub mod scope;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use entities::{Brand, Category, ParentRef, Product, Sale};
pub use report::{aggregate, parse_month_window, SalesReport, DEFAULT_MONTH_WINDOW};
pub use scope::{resolve_brand_scope, Anchor, BrandScope, Catalog};
pub use state::{reduce, Action, DashboardState, LoadStrategy, EAGER_LOAD_THRESHOLD};
pub use store::{
    delete_brand, delete_category, delete_product, delete_sale, get_all_brands,
    get_all_categories, get_all_products, get_all_sales, get_brand_by_id, get_brands_by_product,
    get_catalog_counts, get_category_by_id, get_product_by_id, get_products_by_category,
    get_sale_by_id, get_sales_by_brand, get_sales_by_brand_and_months, get_sales_for_year,
    insert_brand, insert_category, insert_product, insert_sale, insert_sales, load_catalog,
    load_sales_csv, seed_demo_data, setup_database, update_brand, update_category,
    update_product, update_sale, CatalogCounts, SeedSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

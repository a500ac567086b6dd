// Record Store - SQLite persistence for the four entity kinds
//
// Plain data-access operations over a rusqlite connection: lookup by id,
// lookup by parent key, create, update, delete. Referential integrity is
// enforced here at write time (FOREIGN KEY + ON DELETE CASCADE); the
// in-memory core never checks it again.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use serde::Deserialize;
use std::path::Path;

use crate::entities::{Brand, Category, Product, Sale};
use crate::scope::Catalog;

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery, and foreign keys must be switched on per
    // connection or the REFERENCES clauses below are inert.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS brands (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS sales (
            id TEXT PRIMARY KEY,
            brand_id TEXT NOT NULL REFERENCES brands(id) ON DELETE CASCADE,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            year INTEGER NOT NULL,
            value REAL NOT NULL CHECK (value >= 0),
            created_at TEXT,
            updated_at TEXT
        )",
        [],
    )?;

    // No uniqueness on (brand_id, year, month): duplicate rows are legal
    // and get summed during aggregation.
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_brands_product ON brands(product_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_sales_brand_year_month ON sales(brand_id, year, month)",
        [],
    )?;

    Ok(())
}

fn to_rfc3339(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|dt| dt.to_rfc3339())
}

fn from_rfc3339(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// Categories
// ============================================================================

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: from_rfc3339(row.get(2)?),
        updated_at: from_rfc3339(row.get(3)?),
    })
}

pub fn insert_category(conn: &Connection, category: &Category) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            category.id,
            category.name,
            to_rfc3339(category.created_at),
            to_rfc3339(category.updated_at),
        ],
    )
    .context("Failed to insert category")?;
    Ok(())
}

pub fn get_all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, created_at, updated_at FROM categories ORDER BY name",
    )?;
    let categories = stmt
        .query_map([], category_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub fn get_category_by_id(conn: &Connection, id: &str) -> Result<Option<Category>> {
    let category = conn
        .query_row(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = ?1",
            params![id],
            category_from_row,
        )
        .optional()?;
    Ok(category)
}

/// Update a category's name. Returns the updated record, or `None` when
/// the id does not exist.
pub fn update_category(conn: &Connection, id: &str, name: &str) -> Result<Option<Category>> {
    let changed = conn.execute(
        "UPDATE categories SET name = ?1, updated_at = ?2 WHERE id = ?3",
        params![name, Utc::now().to_rfc3339(), id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_category_by_id(conn, id)
}

/// Delete a category. Cascades to its products, their brands, and their
/// sales. Returns false when the id does not exist.
pub fn delete_category(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

// ============================================================================
// Products
// ============================================================================

fn product_from_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        category_id: row.get::<_, String>(2)?.into(),
        created_at: from_rfc3339(row.get(3)?),
        updated_at: from_rfc3339(row.get(4)?),
    })
}

pub fn insert_product(conn: &Connection, product: &Product) -> Result<()> {
    conn.execute(
        "INSERT INTO products (id, name, category_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product.id,
            product.name,
            product.category_key(),
            to_rfc3339(product.created_at),
            to_rfc3339(product.updated_at),
        ],
    )
    .context("Failed to insert product")?;
    Ok(())
}

pub fn get_all_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, created_at, updated_at FROM products ORDER BY name",
    )?;
    let products = stmt
        .query_map([], product_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(products)
}

pub fn get_product_by_id(conn: &Connection, id: &str) -> Result<Option<Product>> {
    let product = conn
        .query_row(
            "SELECT id, name, category_id, created_at, updated_at FROM products WHERE id = ?1",
            params![id],
            product_from_row,
        )
        .optional()?;
    Ok(product)
}

pub fn get_products_by_category(conn: &Connection, category_id: &str) -> Result<Vec<Product>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, created_at, updated_at
         FROM products WHERE category_id = ?1 ORDER BY name",
    )?;
    let products = stmt
        .query_map(params![category_id], product_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(products)
}

pub fn update_product(
    conn: &Connection,
    id: &str,
    name: &str,
    category_id: &str,
) -> Result<Option<Product>> {
    let changed = conn.execute(
        "UPDATE products SET name = ?1, category_id = ?2, updated_at = ?3 WHERE id = ?4",
        params![name, category_id, Utc::now().to_rfc3339(), id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_product_by_id(conn, id)
}

pub fn delete_product(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

// ============================================================================
// Brands
// ============================================================================

fn brand_from_row(row: &Row) -> rusqlite::Result<Brand> {
    Ok(Brand {
        id: row.get(0)?,
        name: row.get(1)?,
        product_id: row.get::<_, String>(2)?.into(),
        created_at: from_rfc3339(row.get(3)?),
        updated_at: from_rfc3339(row.get(4)?),
    })
}

pub fn insert_brand(conn: &Connection, brand: &Brand) -> Result<()> {
    conn.execute(
        "INSERT INTO brands (id, name, product_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            brand.id,
            brand.name,
            brand.product_key(),
            to_rfc3339(brand.created_at),
            to_rfc3339(brand.updated_at),
        ],
    )
    .context("Failed to insert brand")?;
    Ok(())
}

pub fn get_all_brands(conn: &Connection) -> Result<Vec<Brand>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, product_id, created_at, updated_at FROM brands ORDER BY name",
    )?;
    let brands = stmt
        .query_map([], brand_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(brands)
}

pub fn get_brand_by_id(conn: &Connection, id: &str) -> Result<Option<Brand>> {
    let brand = conn
        .query_row(
            "SELECT id, name, product_id, created_at, updated_at FROM brands WHERE id = ?1",
            params![id],
            brand_from_row,
        )
        .optional()?;
    Ok(brand)
}

pub fn get_brands_by_product(conn: &Connection, product_id: &str) -> Result<Vec<Brand>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, product_id, created_at, updated_at
         FROM brands WHERE product_id = ?1 ORDER BY name",
    )?;
    let brands = stmt
        .query_map(params![product_id], brand_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(brands)
}

pub fn update_brand(
    conn: &Connection,
    id: &str,
    name: &str,
    product_id: &str,
) -> Result<Option<Brand>> {
    let changed = conn.execute(
        "UPDATE brands SET name = ?1, product_id = ?2, updated_at = ?3 WHERE id = ?4",
        params![name, product_id, Utc::now().to_rfc3339(), id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_brand_by_id(conn, id)
}

pub fn delete_brand(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM brands WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

// ============================================================================
// Sales
// ============================================================================

fn sale_from_row(row: &Row) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: row.get(0)?,
        brand_id: row.get::<_, String>(1)?.into(),
        month: row.get::<_, i64>(2)? as u8,
        year: row.get::<_, i64>(3)? as i32,
        value: row.get(4)?,
        created_at: from_rfc3339(row.get(5)?),
        updated_at: from_rfc3339(row.get(6)?),
    })
}

pub fn insert_sale(conn: &Connection, sale: &Sale) -> Result<()> {
    conn.execute(
        "INSERT INTO sales (id, brand_id, month, year, value, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            sale.id,
            sale.brand_key(),
            sale.month as i64,
            sale.year,
            sale.value,
            to_rfc3339(sale.created_at),
            to_rfc3339(sale.updated_at),
        ],
    )
    .context("Failed to insert sale")?;
    Ok(())
}

pub fn insert_sales(conn: &Connection, sales: &[Sale]) -> Result<usize> {
    for sale in sales {
        insert_sale(conn, sale)?;
    }
    Ok(sales.len())
}

pub fn get_all_sales(conn: &Connection) -> Result<Vec<Sale>> {
    let mut stmt = conn.prepare(
        "SELECT id, brand_id, month, year, value, created_at, updated_at
         FROM sales ORDER BY year DESC, month ASC",
    )?;
    let sales = stmt
        .query_map([], sale_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sales)
}

pub fn get_sale_by_id(conn: &Connection, id: &str) -> Result<Option<Sale>> {
    let sale = conn
        .query_row(
            "SELECT id, brand_id, month, year, value, created_at, updated_at
             FROM sales WHERE id = ?1",
            params![id],
            sale_from_row,
        )
        .optional()?;
    Ok(sale)
}

pub fn get_sales_by_brand(
    conn: &Connection,
    brand_id: &str,
    year: Option<i32>,
) -> Result<Vec<Sale>> {
    match year {
        Some(year) => {
            let mut stmt = conn.prepare(
                "SELECT id, brand_id, month, year, value, created_at, updated_at
                 FROM sales WHERE brand_id = ?1 AND year = ?2 ORDER BY month ASC",
            )?;
            let sales = stmt
                .query_map(params![brand_id, year], sale_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sales)
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, brand_id, month, year, value, created_at, updated_at
                 FROM sales WHERE brand_id = ?1 ORDER BY month ASC",
            )?;
            let sales = stmt
                .query_map(params![brand_id], sale_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sales)
        }
    }
}

/// Sales for one brand restricted to the given months and optional year,
/// the query behind the month-filtered API endpoint.
pub fn get_sales_by_brand_and_months(
    conn: &Connection,
    brand_id: &str,
    months: &[u8],
    year: Option<i32>,
) -> Result<Vec<Sale>> {
    if months.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; months.len()].join(", ");
    let mut sql = format!(
        "SELECT id, brand_id, month, year, value, created_at, updated_at
         FROM sales WHERE brand_id = ? AND month IN ({placeholders})"
    );
    if year.is_some() {
        sql.push_str(" AND year = ?");
    }
    sql.push_str(" ORDER BY month ASC");

    let mut values: Vec<Box<dyn ToSql>> = Vec::with_capacity(months.len() + 2);
    values.push(Box::new(brand_id.to_string()));
    for &month in months {
        values.push(Box::new(month as i64));
    }
    if let Some(year) = year {
        values.push(Box::new(year));
    }

    let mut stmt = conn.prepare(&sql)?;
    let sales = stmt
        .query_map(params_from_iter(values.iter().map(|v| v.as_ref())), sale_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sales)
}

pub fn get_sales_for_year(conn: &Connection, year: i32) -> Result<Vec<Sale>> {
    let mut stmt = conn.prepare(
        "SELECT id, brand_id, month, year, value, created_at, updated_at
         FROM sales WHERE year = ?1 ORDER BY month ASC",
    )?;
    let sales = stmt
        .query_map(params![year], sale_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sales)
}

pub fn update_sale(
    conn: &Connection,
    id: &str,
    month: u8,
    value: f64,
    year: i32,
) -> Result<Option<Sale>> {
    let changed = conn.execute(
        "UPDATE sales SET month = ?1, value = ?2, year = ?3, updated_at = ?4 WHERE id = ?5",
        params![month as i64, value, year, Utc::now().to_rfc3339(), id],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    get_sale_by_id(conn, id)
}

pub fn delete_sale(conn: &Connection, id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM sales WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

// ============================================================================
// Catalog loading
// ============================================================================

/// Entity counts feeding the eager/deferred load decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub categories: usize,
    pub products: usize,
    pub brands: usize,
}

impl CatalogCounts {
    pub fn total(&self) -> usize {
        self.categories + self.products + self.brands
    }
}

pub fn get_catalog_counts(conn: &Connection) -> Result<CatalogCounts> {
    let count = |table: &str| -> Result<usize> {
        let n: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n as usize)
    };
    Ok(CatalogCounts {
        categories: count("categories")?,
        products: count("products")?,
        brands: count("brands")?,
    })
}

/// Load the full catalog snapshot for in-memory scope resolution.
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    Ok(Catalog::new(
        get_all_categories(conn)?,
        get_all_products(conn)?,
        get_all_brands(conn)?,
    ))
}

// ============================================================================
// CSV import
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleCsvRow {
    brand_id: String,
    month: u8,
    year: i32,
    value: f64,
}

/// Load sale rows from a CSV file with headers `brandId,month,year,value`.
pub fn load_sales_csv(csv_path: &Path) -> Result<Vec<Sale>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut sales = Vec::new();
    for result in rdr.deserialize() {
        let row: SaleCsvRow = result.context("Failed to deserialize sale row")?;
        sales.push(Sale::new(row.brand_id, row.month, row.year, row.value));
    }

    Ok(sales)
}

// ============================================================================
// Demo seed
// ============================================================================

/// What `seed_demo_data` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub brands: usize,
    pub sales: usize,
}

/// Populate an empty database with the demo catalog: 3 categories, 16
/// products, 3-5 brands per product, and one sale per brand for each of
/// months 1-4 of the current year. Values are deterministic so repeated
/// seeds produce identical reports.
pub fn seed_demo_data(conn: &Connection) -> Result<SeedSummary> {
    let product_names: [(&str, &[&str]); 3] = [
        ("Food", &["Fruit", "Vegetables", "Meat", "Dairy", "Grains", "Sweets"]),
        ("Drink", &["Soda", "Juice", "Water", "Coffee", "Tea"]),
        ("Electronics", &["Smartphone", "Notebook", "Tablet", "Smart TV", "Headphones"]),
    ];

    let year = Utc::now().year();
    let mut summary = SeedSummary {
        categories: 0,
        products: 0,
        brands: 0,
        sales: 0,
    };

    let mut product_index = 0usize;
    for (category_name, products) in product_names {
        let category = Category::new(category_name);
        insert_category(conn, &category)?;
        summary.categories += 1;

        for product_name in products {
            let product = Product::new(*product_name, category.id.clone());
            insert_product(conn, &product)?;
            summary.products += 1;

            // 3 to 5 brands per product.
            let brand_count = 3 + (product_index % 3);
            for i in 1..=brand_count {
                let brand = Brand::new(format!("{product_name} Brand {i}"), product.id.clone());
                insert_brand(conn, &brand)?;
                summary.brands += 1;

                for month in 1..=4u8 {
                    // Deterministic stand-in for the original's random
                    // 50..1000 draw.
                    let value =
                        50.0 + ((product_index * 311 + i * 97 + month as usize * 53) % 950) as f64;
                    insert_sale(conn, &Sale::new(brand.id.clone(), month, year, value))?;
                    summary.sales += 1;
                }
            }
            product_index += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{aggregate, DEFAULT_MONTH_WINDOW};
    use crate::scope::{resolve_brand_scope, Anchor};
    use crate::state::LoadStrategy;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    /// Category "Food" → Product "Fruit" → Brands "Fruits1", "Fruits2",
    /// with the eight fixture sales.
    fn seed_fruit(conn: &Connection) -> (Category, Product, Brand, Brand) {
        let food = Category::new("Food");
        insert_category(conn, &food).unwrap();

        let fruit = Product::new("Fruit", food.id.clone());
        insert_product(conn, &fruit).unwrap();

        let fruits1 = Brand::new("Fruits1", fruit.id.clone());
        let fruits2 = Brand::new("Fruits2", fruit.id.clone());
        insert_brand(conn, &fruits1).unwrap();
        insert_brand(conn, &fruits2).unwrap();

        for (brand, values) in [
            (&fruits1, [120.0, 140.0, 110.0, 95.0]),
            (&fruits2, [103.0, 150.0, 60.0, 30.0]),
        ] {
            for (i, value) in values.iter().enumerate() {
                insert_sale(conn, &Sale::new(brand.id.clone(), i as u8 + 1, 2026, *value))
                    .unwrap();
            }
        }

        (food, fruit, fruits1, fruits2)
    }

    #[test]
    fn test_category_round_trip() {
        let conn = test_conn();
        let category = Category::new("Food");
        insert_category(&conn, &category).unwrap();

        let found = get_category_by_id(&conn, &category.id).unwrap().unwrap();
        assert_eq!(found.name, "Food");

        let updated = update_category(&conn, &category.id, "Groceries")
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Groceries");

        assert!(get_category_by_id(&conn, "missing").unwrap().is_none());
        assert!(update_category(&conn, "missing", "X").unwrap().is_none());

        assert!(delete_category(&conn, &category.id).unwrap());
        assert!(!delete_category(&conn, &category.id).unwrap());
        assert!(get_all_categories(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_parent() {
        let conn = test_conn();
        let (food, fruit, fruits1, fruits2) = seed_fruit(&conn);

        let products = get_products_by_category(&conn, &food.id).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, fruit.id);

        let brands = get_brands_by_product(&conn, &fruit.id).unwrap();
        let mut names: Vec<&str> = brands.iter().map(|b| b.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Fruits1", "Fruits2"]);

        assert_eq!(get_sales_by_brand(&conn, &fruits1.id, None).unwrap().len(), 4);
        assert_eq!(get_sales_by_brand(&conn, &fruits2.id, Some(2026)).unwrap().len(), 4);
        assert_eq!(get_sales_by_brand(&conn, &fruits2.id, Some(1999)).unwrap().len(), 0);
    }

    #[test]
    fn test_sales_month_filter() {
        let conn = test_conn();
        let (_, _, fruits1, _) = seed_fruit(&conn);

        let sales =
            get_sales_by_brand_and_months(&conn, &fruits1.id, &[1, 2], Some(2026)).unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].month, 1);
        assert_eq!(sales[0].value, 120.0);
        assert_eq!(sales[1].month, 2);

        let none = get_sales_by_brand_and_months(&conn, &fruits1.id, &[], Some(2026)).unwrap();
        assert!(none.is_empty());

        let wrong_year =
            get_sales_by_brand_and_months(&conn, &fruits1.id, &[1, 2], Some(1999)).unwrap();
        assert!(wrong_year.is_empty());
    }

    #[test]
    fn test_sale_update_and_delete() {
        let conn = test_conn();
        let (_, _, fruits1, _) = seed_fruit(&conn);
        let sale = get_sales_by_brand(&conn, &fruits1.id, None).unwrap()[0].clone();

        let updated = update_sale(&conn, &sale.id, 6, 999.0, 2027).unwrap().unwrap();
        assert_eq!(updated.month, 6);
        assert_eq!(updated.value, 999.0);
        assert_eq!(updated.year, 2027);

        assert!(delete_sale(&conn, &sale.id).unwrap());
        assert!(get_sale_by_id(&conn, &sale.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_category_cascades_to_sales() {
        let conn = test_conn();
        let (food, _, _, _) = seed_fruit(&conn);

        assert_eq!(get_all_sales(&conn).unwrap().len(), 8);
        assert!(delete_category(&conn, &food.id).unwrap());

        assert!(get_all_products(&conn).unwrap().is_empty());
        assert!(get_all_brands(&conn).unwrap().is_empty());
        assert!(get_all_sales(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_insert_sale_requires_existing_brand() {
        let conn = test_conn();
        let orphan = Sale::new("no-such-brand", 1, 2026, 10.0);

        assert!(insert_sale(&conn, &orphan).is_err());
    }

    #[test]
    fn test_duplicate_sale_rows_are_allowed() {
        let conn = test_conn();
        let (_, _, fruits1, _) = seed_fruit(&conn);

        insert_sale(&conn, &Sale::new(fruits1.id.clone(), 1, 2026, 50.0)).unwrap();
        insert_sale(&conn, &Sale::new(fruits1.id.clone(), 1, 2026, 70.0)).unwrap();

        let january =
            get_sales_by_brand_and_months(&conn, &fruits1.id, &[1], Some(2026)).unwrap();
        assert_eq!(january.len(), 3); // seeded 120 + the two duplicates
    }

    #[test]
    fn test_store_feeds_core_end_to_end() {
        let conn = test_conn();
        let (food, _, _, _) = seed_fruit(&conn);

        let catalog = load_catalog(&conn).unwrap();
        let scope = resolve_brand_scope(&Anchor::Category(food.id.clone()), &catalog);
        assert_eq!(scope.len(), Some(2));

        let sales = get_sales_for_year(&conn, 2026).unwrap();
        let report = aggregate(&sales, &scope, &DEFAULT_MONTH_WINDOW);

        assert_eq!(report.per_month, vec![223.0, 290.0, 170.0, 125.0]);
        assert_eq!(report.total, 808.0);
        assert_eq!(report.average, 101.0);
        assert_eq!(report.max, 150.0);
        assert_eq!(report.min, 30.0);
    }

    #[test]
    fn test_catalog_counts_and_strategy() {
        let conn = test_conn();
        seed_fruit(&conn);

        let counts = get_catalog_counts(&conn).unwrap();
        assert_eq!(counts.categories, 1);
        assert_eq!(counts.products, 1);
        assert_eq!(counts.brands, 2);
        assert_eq!(counts.total(), 4);
        assert_eq!(LoadStrategy::choose(counts.total()), LoadStrategy::Eager);
    }

    #[test]
    fn test_seed_demo_data_volume() {
        let conn = test_conn();
        let summary = seed_demo_data(&conn).unwrap();

        assert_eq!(summary.categories, 3);
        assert_eq!(summary.products, 16);
        // 3 + (idx % 3) brands per product, 4 sales per brand.
        assert_eq!(summary.brands, (0..16).map(|i| 3 + (i % 3)).sum::<usize>());
        assert_eq!(summary.sales, summary.brands * 4);

        let counts = get_catalog_counts(&conn).unwrap();
        assert_eq!(counts.total(), 3 + 16 + summary.brands);
        assert_eq!(get_all_sales(&conn).unwrap().len(), summary.sales);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = test_conn();
        let b = test_conn();
        seed_demo_data(&a).unwrap();
        seed_demo_data(&b).unwrap();

        let totals = |conn: &Connection| -> f64 {
            get_all_sales(conn).unwrap().iter().map(|s| s.value).sum()
        };
        assert_eq!(totals(&a), totals(&b));
    }

    #[test]
    fn test_load_sales_csv() {
        let dir = std::env::temp_dir().join(format!("sales-csv-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sales.csv");
        std::fs::write(
            &path,
            "brandId,month,year,value\nb-1,1,2026,120.5\nb-2,2,2026,99\n",
        )
        .unwrap();

        let sales = load_sales_csv(&path).unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].brand_key(), "b-1");
        assert_eq!(sales[0].value, 120.5);
        assert_eq!(sales[1].month, 2);

        std::fs::remove_dir_all(&dir).ok();
    }
}

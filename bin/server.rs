// Sales Report - Web Server
// REST API over the catalog store plus the report endpoint

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use sales_report::{
    aggregate, parse_month_window, resolve_brand_scope, store, Anchor, Brand, Category, Product,
    Sale, SalesReport,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(ApiResponse::err(message))).into_response()
}

fn internal_error(context: &str, err: anyhow::Error) -> axum::response::Response {
    eprintln!("Error {context}: {err}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}

// ============================================================================
// Health
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Deserialize)]
struct CategoryBody {
    name: Option<String>,
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_all_categories(&conn) {
        Ok(categories) => (StatusCode::OK, Json(ApiResponse::ok(categories))).into_response(),
        Err(e) => internal_error("fetching categories", e),
    }
}

/// GET /api/categories/:id
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_category_by_id(&conn, &id) {
        Ok(Some(category)) => (StatusCode::OK, Json(ApiResponse::ok(category))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => internal_error("fetching category", e),
    }
}

/// POST /api/categories
async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> impl IntoResponse {
    let Some(name) = body.name else {
        return error_response(StatusCode::BAD_REQUEST, "name is required");
    };

    let category = Category::new(name);
    let conn = state.db.lock().unwrap();
    match store::insert_category(&conn, &category) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::ok(category))).into_response(),
        Err(e) => internal_error("creating category", e),
    }
}

/// PUT /api/categories/:id
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryBody>,
) -> impl IntoResponse {
    let Some(name) = body.name else {
        return error_response(StatusCode::BAD_REQUEST, "name is required");
    };

    let conn = state.db.lock().unwrap();
    match store::update_category(&conn, &id, &name) {
        Ok(Some(category)) => (StatusCode::OK, Json(ApiResponse::ok(category))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => internal_error("updating category", e),
    }
}

/// DELETE /api/categories/:id
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::delete_category(&conn, &id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Category not found"),
        Err(e) => internal_error("deleting category", e),
    }
}

// ============================================================================
// Products
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody {
    name: Option<String>,
    category_id: Option<String>,
}

/// GET /api/products
async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_all_products(&conn) {
        Ok(products) => (StatusCode::OK, Json(ApiResponse::ok(products))).into_response(),
        Err(e) => internal_error("fetching products", e),
    }
}

/// GET /api/products/:id
async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_product_by_id(&conn, &id) {
        Ok(Some(product)) => (StatusCode::OK, Json(ApiResponse::ok(product))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => internal_error("fetching product", e),
    }
}

/// GET /api/products/category/:categoryId
async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_products_by_category(&conn, &category_id) {
        Ok(products) => (StatusCode::OK, Json(ApiResponse::ok(products))).into_response(),
        Err(e) => internal_error("fetching products by category", e),
    }
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> impl IntoResponse {
    let (Some(name), Some(category_id)) = (body.name, body.category_id) else {
        return error_response(StatusCode::BAD_REQUEST, "name and categoryId are required");
    };

    let product = Product::new(name, category_id);
    let conn = state.db.lock().unwrap();
    match store::insert_product(&conn, &product) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::ok(product))).into_response(),
        Err(e) => internal_error("creating product", e),
    }
}

/// PUT /api/products/:id
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> impl IntoResponse {
    let (Some(name), Some(category_id)) = (body.name, body.category_id) else {
        return error_response(StatusCode::BAD_REQUEST, "name and categoryId are required");
    };

    let conn = state.db.lock().unwrap();
    match store::update_product(&conn, &id, &name, &category_id) {
        Ok(Some(product)) => (StatusCode::OK, Json(ApiResponse::ok(product))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => internal_error("updating product", e),
    }
}

/// DELETE /api/products/:id
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::delete_product(&conn, &id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Product not found"),
        Err(e) => internal_error("deleting product", e),
    }
}

// ============================================================================
// Brands
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrandBody {
    name: Option<String>,
    product_id: Option<String>,
}

/// GET /api/brands
async fn list_brands(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_all_brands(&conn) {
        Ok(brands) => (StatusCode::OK, Json(ApiResponse::ok(brands))).into_response(),
        Err(e) => internal_error("fetching brands", e),
    }
}

/// GET /api/brands/:id
async fn get_brand(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_brand_by_id(&conn, &id) {
        Ok(Some(brand)) => (StatusCode::OK, Json(ApiResponse::ok(brand))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Brand not found"),
        Err(e) => internal_error("fetching brand", e),
    }
}

/// GET /api/brands/product/:productId
async fn list_brands_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_brands_by_product(&conn, &product_id) {
        Ok(brands) => (StatusCode::OK, Json(ApiResponse::ok(brands))).into_response(),
        Err(e) => internal_error("fetching brands by product", e),
    }
}

/// POST /api/brands
async fn create_brand(
    State(state): State<AppState>,
    Json(body): Json<BrandBody>,
) -> impl IntoResponse {
    let (Some(name), Some(product_id)) = (body.name, body.product_id) else {
        return error_response(StatusCode::BAD_REQUEST, "name and productId are required");
    };

    let brand = Brand::new(name, product_id);
    let conn = state.db.lock().unwrap();
    match store::insert_brand(&conn, &brand) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::ok(brand))).into_response(),
        Err(e) => internal_error("creating brand", e),
    }
}

/// PUT /api/brands/:id
async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<BrandBody>,
) -> impl IntoResponse {
    let (Some(name), Some(product_id)) = (body.name, body.product_id) else {
        return error_response(StatusCode::BAD_REQUEST, "name and productId are required");
    };

    let conn = state.db.lock().unwrap();
    match store::update_brand(&conn, &id, &name, &product_id) {
        Ok(Some(brand)) => (StatusCode::OK, Json(ApiResponse::ok(brand))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Brand not found"),
        Err(e) => internal_error("updating brand", e),
    }
}

/// DELETE /api/brands/:id
async fn delete_brand(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::delete_brand(&conn, &id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Brand not found"),
        Err(e) => internal_error("deleting brand", e),
    }
}

// ============================================================================
// Sales
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSaleBody {
    brand_id: Option<String>,
    month: Option<u8>,
    value: Option<f64>,
    year: Option<i32>,
}

#[derive(Deserialize)]
struct UpdateSaleBody {
    month: Option<u8>,
    value: Option<f64>,
    year: Option<i32>,
}

/// Comma-separated months plus an optional year, both with defaults.
#[derive(Deserialize)]
struct SalesQuery {
    months: Option<String>,
    year: Option<i32>,
}

/// GET /api/sales
async fn list_sales(State(state): State<AppState>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_all_sales(&conn) {
        Ok(sales) => (StatusCode::OK, Json(ApiResponse::ok(sales))).into_response(),
        Err(e) => internal_error("fetching sales", e),
    }
}

/// GET /api/sales/:id
async fn get_sale(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::get_sale_by_id(&conn, &id) {
        Ok(Some(sale)) => (StatusCode::OK, Json(ApiResponse::ok(sale))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Sale not found"),
        Err(e) => internal_error("fetching sale", e),
    }
}

/// GET /api/sales/brand/:brandId?months=1,2,3,4&year=2026
async fn list_sales_by_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
    Query(query): Query<SalesQuery>,
) -> impl IntoResponse {
    let months = parse_month_window(query.months.as_deref());
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let conn = state.db.lock().unwrap();
    match store::get_sales_by_brand_and_months(&conn, &brand_id, &months, Some(year)) {
        Ok(sales) => (StatusCode::OK, Json(ApiResponse::ok(sales))).into_response(),
        Err(e) => internal_error("fetching sales by brand", e),
    }
}

/// POST /api/sales
async fn create_sale(
    State(state): State<AppState>,
    Json(body): Json<CreateSaleBody>,
) -> impl IntoResponse {
    let (Some(brand_id), Some(month), Some(value), Some(year)) =
        (body.brand_id, body.month, body.value, body.year)
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "brandId, month, value, and year are required",
        );
    };
    if !(1..=12).contains(&month) || value < 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "month must be 1-12 and value >= 0");
    }

    let sale = Sale::new(brand_id, month, year, value);
    let conn = state.db.lock().unwrap();
    match store::insert_sale(&conn, &sale) {
        Ok(()) => (StatusCode::CREATED, Json(ApiResponse::ok(sale))).into_response(),
        Err(e) => internal_error("creating sale", e),
    }
}

/// PUT /api/sales/:id
async fn update_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSaleBody>,
) -> impl IntoResponse {
    let (Some(month), Some(value), Some(year)) = (body.month, body.value, body.year) else {
        return error_response(StatusCode::BAD_REQUEST, "month, value, and year are required");
    };
    if !(1..=12).contains(&month) || value < 0.0 {
        return error_response(StatusCode::BAD_REQUEST, "month must be 1-12 and value >= 0");
    }

    let conn = state.db.lock().unwrap();
    match store::update_sale(&conn, &id, month, value, year) {
        Ok(Some(sale)) => (StatusCode::OK, Json(ApiResponse::ok(sale))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Sale not found"),
        Err(e) => internal_error("updating sale", e),
    }
}

/// DELETE /api/sales/:id
async fn delete_sale(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let conn = state.db.lock().unwrap();
    match store::delete_sale(&conn, &id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Sale not found"),
        Err(e) => internal_error("deleting sale", e),
    }
}

// ============================================================================
// Report
// ============================================================================

/// At most one of category/product/brand is honored; the most specific
/// wins, mirroring the dashboard's selection cascade.
#[derive(Deserialize)]
struct ReportQuery {
    category: Option<String>,
    product: Option<String>,
    brand: Option<String>,
    months: Option<String>,
    year: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportResponse {
    year: i32,
    months: Vec<u8>,
    /// Brands in scope; absent when the report is unfiltered.
    #[serde(skip_serializing_if = "Option::is_none")]
    brands_in_scope: Option<usize>,
    #[serde(flatten)]
    report: SalesReport,
}

/// GET /api/report?brand=..|product=..|category=..&months=1,2,3,4&year=2026
async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> impl IntoResponse {
    let anchor = if let Some(id) = query.brand {
        Anchor::Brand(id)
    } else if let Some(id) = query.product {
        Anchor::Product(id)
    } else if let Some(id) = query.category {
        Anchor::Category(id)
    } else {
        Anchor::None
    };

    let months = parse_month_window(query.months.as_deref());
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let conn = state.db.lock().unwrap();
    let catalog = match store::load_catalog(&conn) {
        Ok(catalog) => catalog,
        Err(e) => return internal_error("loading catalog", e),
    };
    let sales = match store::get_sales_for_year(&conn, year) {
        Ok(sales) => sales,
        Err(e) => return internal_error("fetching sales", e),
    };

    let scope = resolve_brand_scope(&anchor, &catalog);
    let report = aggregate(&sales, &scope, &months);

    let response = ReportResponse {
        year,
        brands_in_scope: scope.len(),
        months,
        report,
    };
    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

// ============================================================================
// Main Server
// ============================================================================

fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/category/:categoryId", get(list_products_by_category))
        .route("/brands", get(list_brands).post(create_brand))
        .route(
            "/brands/:id",
            get(get_brand).put(update_brand).delete(delete_brand),
        )
        .route("/brands/product/:productId", get(list_brands_by_product))
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/:id",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
        .route("/sales/brand/:brandId", get(list_sales_by_brand))
        .route("/report", get(get_report))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    println!("Sales Report - Web Server");

    let db_path = std::env::var("SALES_REPORT_DB").unwrap_or_else(|_| "sales-report.db".into());
    let conn = Connection::open(&db_path).expect("Failed to open database");
    sales_report::setup_database(&conn).expect("Failed to set up database");
    println!("✓ Database opened: {db_path}");

    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
    };

    let app = Router::new()
        .nest("/api", api_routes(state))
        .layer(CorsLayer::permissive());

    let addr = std::env::var("SALES_REPORT_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    println!("Server running on http://{addr}");
    println!("  Report: http://{addr}/api/report");
    println!("  Press Ctrl+C to stop");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

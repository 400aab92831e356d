//! End-to-end tests for Driftwood.
//!
//! # Running Tests
//!
//! These tests drive a running server over HTTP and are ignored by default:
//!
//! ```bash
//! # Start PostgreSQL, migrate, seed, and run the server
//! dw-cli migrate && dw-cli seed
//! cargo run -p driftwood-server
//!
//! # Run the ignored end-to-end tests
//! cargo test -p driftwood-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `API_BASE_URL` - Server base URL (default: `http://localhost:3000`)
//! - `DRIFTWOOD_ADMIN_TOKEN` - Admin token, required for tests that create
//!   catalog data or drive order status

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Admin token for catalog/bootstrap calls.
///
/// # Panics
///
/// Panics if `DRIFTWOOD_ADMIN_TOKEN` is not set; the admin-driven tests
/// can't run without it.
#[must_use]
pub fn admin_token() -> String {
    std::env::var("DRIFTWOOD_ADMIN_TOKEN").expect("DRIFTWOOD_ADMIN_TOKEN must be set")
}

/// A client with a cookie store, i.e. one browser session.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a product with one variant via the admin API.
///
/// Returns `(product_slug, variant_id)`. Slug and SKU are randomized so
/// tests don't collide.
///
/// # Panics
///
/// Panics if either create call fails.
pub async fn create_test_product(client: &Client, price: &str, stock: i32) -> (String, i64) {
    let base = base_url();
    let token = admin_token();
    let tag = Uuid::new_v4().simple().to_string();
    let slug = format!("e2e-product-{tag}");

    let resp = client
        .post(format!("{base}/admin/products"))
        .bearer_auth(&token)
        .json(&json!({
            "name": format!("E2E Product {tag}"),
            "slug": slug,
            "description": "end-to-end fixture",
            "price": price,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), 201, "product create failed");
    let body: Value = resp.json().await.expect("invalid product JSON");
    let product_id = body["data"]["id"].as_i64().expect("product id");

    let resp = client
        .post(format!("{base}/admin/products/{product_id}/variants"))
        .bearer_auth(&token)
        .json(&json!({
            "sku": format!("E2E-{tag}"),
            "size": "M",
            "stock": stock,
        }))
        .send()
        .await
        .expect("Failed to create variant");
    assert_eq!(resp.status(), 201, "variant create failed");
    let body: Value = resp.json().await.expect("invalid variant JSON");
    let variant_id = body["data"]["id"].as_i64().expect("variant id");

    (slug, variant_id)
}

/// Fetch a product's detail JSON by slug.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn get_product(client: &Client, slug: &str) -> Value {
    let base = base_url();
    let resp = client
        .get(format!("{base}/products/{slug}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), 200);
    resp.json().await.expect("invalid product JSON")
}

/// Add a variant to the session's cart.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn add_to_cart(client: &Client, variant_id: i64, quantity: i32) -> reqwest::Response {
    let base = base_url();
    client
        .post(format!("{base}/cart/items"))
        .json(&json!({ "variant_id": variant_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart")
}

/// A well-formed shipping address body fragment.
#[must_use]
pub fn shipping_address() -> Value {
    json!({
        "street": "1 Harbor Way",
        "city": "Port Haven",
        "postal_code": "04401",
        "country": "US",
    })
}

//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - DB-checked readiness
//!
//! # Catalog
//! GET  /products                   - Product listing
//! GET  /products/{slug}            - Product detail (images + variants)
//! GET  /collections                - Collection listing
//! GET  /collections/{slug}         - Collection detail with products
//! GET  /categories                 - Category listing
//!
//! # Cart
//! GET    /cart                     - Fetch-or-create cart for current identity
//! POST   /cart/items               - Add item {variant_id, quantity}
//! PUT    /cart/items/{id}          - Set item quantity (<= 0 deletes)
//! DELETE /cart/items/{id}          - Remove item
//! DELETE /cart                     - Clear cart
//!
//! # Checkout
//! POST /checkout/session           - Load checkout snapshot of cart
//! POST /checkout/validate          - Pre-flight validation {shipping_address}
//! POST /checkout/calculate         - Compute totals
//! POST /checkout/place-order       - Create order
//!
//! # Orders (requires auth)
//! GET  /orders                     - List own orders
//! GET  /orders/{id}                - Own order detail
//! GET  /orders/{id}/status         - Own order status
//!
//! # Auth
//! POST /auth/register              - Register account
//! POST /auth/login                 - Login (merges anonymous cart)
//! POST /auth/logout                - Logout
//!
//! # Admin (requires admin token)
//! GET  /admin/orders               - List all orders
//! GET  /admin/orders/{id}          - Any order detail
//! PUT  /admin/orders/{id}/status   - Move order status
//! POST /admin/products             - Create product
//! PUT  /admin/products/{id}        - Replace product
//! DELETE /admin/products/{id}      - Delete product
//! POST /admin/products/{id}/variants - Create variant
//! POST /admin/categories           - Create category
//! POST /admin/collections          - Create collection
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod collections;
pub mod orders;
pub mod products;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};

use crate::middleware::{provision_cart_token, require_admin};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .layer(from_fn(provision_cart_token))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(checkout::session))
        .route("/validate", post(checkout::validate))
        .route("/calculate", post(checkout::calculate))
        .route("/place-order", post(checkout::place_order))
        .layer(from_fn(provision_cart_token))
}

/// Create the customer order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", get(orders::status))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router, gated by the admin token.
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}", get(admin::show_order))
        .route("/orders/{id}/status", put(admin::update_order_status))
        .route("/products", post(admin::create_product))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/products/{id}/variants", post(admin::create_variant))
        .route("/categories", post(admin::create_category))
        .route("/collections", post(admin::create_collection))
        .layer(from_fn_with_state(state, require_admin))
}

/// Create all routes for the storefront API.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/collections", get(collections::index))
        .route("/collections/{slug}", get(collections::show))
        .route("/categories", get(categories::index))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Orders
        .nest("/orders", order_routes())
        // Auth
        .nest("/auth", auth_routes())
        // Admin
        .nest("/admin", admin_routes(state))
}

//! Admin route handlers: order management and catalog CRUD.
//!
//! Everything here sits behind the admin-token middleware.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use driftwood_core::{CategoryId, CollectionId, OrderId, OrderStatus, Price, ProductId};

use crate::db::ProductRepository;
use crate::db::products::{ProductInput, VariantInput};
use crate::error::{AppError, Result};
use crate::response::{created, ok, ok_message};
use crate::services::orders::OrderQueryService;
use crate::state::AppState;

// =============================================================================
// Orders
// =============================================================================

/// Order status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// List all orders, newest first.
#[instrument(skip(state))]
pub async fn list_orders(State(state): State<AppState>) -> Result<Response> {
    let orders = OrderQueryService::new(state.pool()).list_all().await?;
    Ok(ok(orders))
}

/// Get any order with its lines.
#[instrument(skip(state))]
pub async fn show_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Response> {
    let order = OrderQueryService::new(state.pool()).get(order_id).await?;
    Ok(ok(order))
}

/// Move an order to a new status.
#[instrument(skip(state))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Response> {
    let order = OrderQueryService::new(state.pool())
        .update_status(order_id, body.status)
        .await?;
    Ok(ok(order))
}

// =============================================================================
// Catalog
// =============================================================================

/// Product create/replace request body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub collection_id: Option<CollectionId>,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput> {
        // Reject negative prices before they reach the database constraint.
        Price::new(self.price).map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(ProductInput {
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
            collection_id: self.collection_id,
        })
    }
}

/// Variant create request body.
#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub sku: String,
    pub size: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stock: i32,
}

/// Category/collection create request body.
#[derive(Debug, Deserialize)]
pub struct TaxonomyRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a product.
#[instrument(skip(state, body))]
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<Response> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok(created(product))
}

/// Replace a product's fields.
#[instrument(skip(state, body))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<ProductRequest>,
) -> Result<Response> {
    let input = body.into_input()?;
    let product = ProductRepository::new(state.pool())
        .update(product_id, &input)
        .await?;
    Ok(ok(product))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Response> {
    ProductRepository::new(state.pool()).delete(product_id).await?;
    Ok(ok_message("product deleted"))
}

/// Create a variant for a product.
#[instrument(skip(state, body))]
pub async fn create_variant(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<VariantRequest>,
) -> Result<Response> {
    if body.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_owned()));
    }

    let variant = ProductRepository::new(state.pool())
        .create_variant(
            product_id,
            &VariantInput {
                sku: body.sku,
                size: body.size,
                color: body.color,
                stock: body.stock,
            },
        )
        .await?;
    Ok(created(variant))
}

/// Create a category.
#[instrument(skip(state, body))]
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<TaxonomyRequest>,
) -> Result<Response> {
    let category = ProductRepository::new(state.pool())
        .create_category(&body.name, &body.slug, body.description.as_deref())
        .await?;
    Ok(created(category))
}

/// Create a collection.
#[instrument(skip(state, body))]
pub async fn create_collection(
    State(state): State<AppState>,
    Json(body): Json<TaxonomyRequest>,
) -> Result<Response> {
    let collection = ProductRepository::new(state.pool())
        .create_collection(&body.name, &body.slug, body.description.as_deref())
        .await?;
    Ok(created(collection))
}

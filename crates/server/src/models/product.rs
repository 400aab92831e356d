//! Catalog domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwood_core::{CategoryId, CollectionId, ImageId, Price, ProductId, VariantId};

/// A product category.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// A curated product collection.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// A product as listed in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe handle, unique across the catalog.
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub category_id: Option<CategoryId>,
    pub collection_id: Option<CollectionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product image.
#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub alt: Option<String>,
    pub position: i32,
}

/// A purchasable SKU-level unit of a product.
///
/// Stock is mutated only by order placement; every other reader sees it as
/// advisory (a cart may hold more than is in stock until checkout).
#[derive(Debug, Clone, Serialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub size: String,
    pub color: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// A product with its images and variants, for detail pages.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
}

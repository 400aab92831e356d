//! Catalog repository: products, variants, images, categories, collections.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use driftwood_core::{CategoryId, CollectionId, ImageId, Price, ProductId, VariantId};

use super::RepositoryError;
use crate::models::product::{
    Category, Collection, Product, ProductDetail, ProductImage, ProductVariant,
};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    slug: String,
    description: String,
    price: Price,
    category_id: Option<i32>,
    collection_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            category_id: row.category_id.map(CategoryId::new),
            collection_id: row.collection_id.map(CollectionId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: i32,
    product_id: i32,
    sku: String,
    size: String,
    color: Option<String>,
    stock: i32,
    created_at: DateTime<Utc>,
}

impl From<VariantRow> for ProductVariant {
    fn from(row: VariantRow) -> Self {
        Self {
            id: VariantId::new(row.id),
            product_id: ProductId::new(row.product_id),
            sku: row.sku,
            size: row.size,
            color: row.color,
            stock: row.stock,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: i32,
    product_id: i32,
    url: String,
    alt: Option<String>,
    position: i32,
}

impl From<ImageRow> for ProductImage {
    fn from(row: ImageRow) -> Self {
        Self {
            id: ImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            url: row.url,
            alt: row.alt,
            position: row.position,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: i32,
    name: String,
    slug: String,
    description: Option<String>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: CollectionId::new(row.id),
            name: row.name,
            slug: row.slug,
            description: row.description,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Fields for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<CategoryId>,
    pub collection_id: Option<CollectionId>,
}

/// Fields for creating a product variant.
#[derive(Debug, Clone)]
pub struct VariantInput {
    pub sku: String,
    pub size: String,
    pub color: Option<String>,
    pub stock: i32,
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, description, price, category_id, collection_id,
                   created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product with its images and variants by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<ProductDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, description, price, category_id, collection_id,
                   created_at, updated_at
            FROM products
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let product = Product::from(row);

        let images = sqlx::query_as::<_, ImageRow>(
            r"
            SELECT id, product_id, url, alt, position
            FROM product_images
            WHERE product_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(product.id)
        .fetch_all(self.pool)
        .await?;

        let variants = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, size, color, stock, created_at
            FROM product_variants
            WHERE product_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(product.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(ProductDetail {
            product,
            images: images.into_iter().map(ProductImage::from).collect(),
            variants: variants.into_iter().map(ProductVariant::from).collect(),
        }))
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (name, slug, description, price, category_id, collection_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, slug, description, price, category_id, collection_id,
                      created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.category_id)
        .bind(input.collection_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(Product::from(row))
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET name = $2, slug = $3, description = $4, price = $5,
                category_id = $6, collection_id = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, description, price, category_id, collection_id,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.category_id)
        .bind(input.collection_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its images and variants.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Get a variant by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        id: VariantId,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            SELECT id, product_id, sku, size, color, stock, created_at
            FROM product_variants
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductVariant::from))
    }

    /// Create a variant for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        input: &VariantInput,
    ) -> Result<ProductVariant, RepositoryError> {
        let row = sqlx::query_as::<_, VariantRow>(
            r"
            INSERT INTO product_variants (product_id, sku, size, color, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, sku, size, color, stock, created_at
            ",
        )
        .bind(product_id)
        .bind(&input.sku)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("sku already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(ProductVariant::from(row))
    }

    // =========================================================================
    // Categories & Collections
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug, description FROM categories ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description
            ",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(Category::from(row))
    }

    /// List all collections.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_collections(&self) -> Result<Vec<Collection>, RepositoryError> {
        let rows = sqlx::query_as::<_, CollectionRow>(
            "SELECT id, name, slug, description FROM collections ORDER BY name ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Collection::from).collect())
    }

    /// Get a collection and its products by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_collection_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Collection, Vec<Product>)>, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            "SELECT id, name, slug, description FROM collections WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let collection = Collection::from(row);

        let products = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, slug, description, price, category_id, collection_id,
                   created_at, updated_at
            FROM products
            WHERE collection_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(collection.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some((
            collection,
            products.into_iter().map(Product::from).collect(),
        )))
    }

    /// Create a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_collection(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
    ) -> Result<Collection, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r"
            INSERT INTO collections (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, description
            ",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("slug already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(Collection::from(row))
    }
}

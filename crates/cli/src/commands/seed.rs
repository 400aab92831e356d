//! Seed command: demo catalog data for local development.
//!
//! Idempotent: re-running skips rows whose slugs or SKUs already exist.

use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{CommandError, database_url};

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: Decimal,
    variants: Vec<SeedVariant>,
}

struct SeedVariant {
    sku: &'static str,
    size: &'static str,
    color: Option<&'static str>,
    stock: i32,
}

fn catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Tide Shirt",
            slug: "tide-shirt",
            description: "Mid-weight organic cotton shirt.",
            price: Decimal::new(50_00, 2),
            variants: vec![
                SeedVariant {
                    sku: "TIDE-SHIRT-S",
                    size: "S",
                    color: Some("navy"),
                    stock: 12,
                },
                SeedVariant {
                    sku: "TIDE-SHIRT-M",
                    size: "M",
                    color: Some("navy"),
                    stock: 3,
                },
                SeedVariant {
                    sku: "TIDE-SHIRT-L",
                    size: "L",
                    color: Some("navy"),
                    stock: 0,
                },
            ],
        },
        SeedProduct {
            name: "Harbor Hoodie",
            slug: "harbor-hoodie",
            description: "Heavyweight fleece hoodie.",
            price: Decimal::new(89_50, 2),
            variants: vec![
                SeedVariant {
                    sku: "HARBOR-HOODIE-M",
                    size: "M",
                    color: Some("charcoal"),
                    stock: 8,
                },
                SeedVariant {
                    sku: "HARBOR-HOODIE-L",
                    size: "L",
                    color: Some("charcoal"),
                    stock: 5,
                },
            ],
        },
        SeedProduct {
            name: "Driftwood Cap",
            slug: "driftwood-cap",
            description: "Low-profile six-panel cap.",
            price: Decimal::new(24_00, 2),
            variants: vec![SeedVariant {
                sku: "DRIFTWOOD-CAP-OS",
                size: "One Size",
                color: None,
                stock: 40,
            }],
        },
    ]
}

/// Seed the database with demo catalog data.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing or a query fails.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let (collection_id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO collections (name, slug, description)
        VALUES ('Shoreline', 'shoreline', 'The year-round staples.')
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        ",
    )
    .fetch_one(&pool)
    .await?;

    for product in catalog() {
        let product_id: Option<(i32,)> = sqlx::query_as(
            r"
            INSERT INTO products (name, slug, description, price, collection_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            ",
        )
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(product.price)
        .bind(collection_id)
        .fetch_optional(&pool)
        .await?;

        let Some((product_id,)) = product_id else {
            tracing::info!("Skipping existing product {}", product.slug);
            continue;
        };

        for variant in &product.variants {
            sqlx::query(
                r"
                INSERT INTO product_variants (product_id, sku, size, color, stock)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (sku) DO NOTHING
                ",
            )
            .bind(product_id)
            .bind(variant.sku)
            .bind(variant.size)
            .bind(variant.color)
            .bind(variant.stock)
            .execute(&pool)
            .await?;
        }

        tracing::info!("Seeded product {}", product.slug);
    }

    tracing::info!("Seed complete");
    Ok(())
}

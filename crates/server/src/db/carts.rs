//! Cart repository for database operations.
//!
//! Carts are located by a [`CartIdentity`]: the authenticated user's ID, an
//! anonymous session token, or both. When both identify a cart, the user's
//! cart wins.

use sqlx::PgPool;
use uuid::Uuid;

use driftwood_core::{CartId, CartItemId, Price, ProductId, UserId, VariantId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartIdentity, CartItem};

/// Internal row type for the cart header.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: Option<i32>,
    session_token: Option<Uuid>,
}

/// Internal row type for cart lines joined with variant and product data.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    variant_id: i32,
    quantity: i32,
    sku: String,
    size: String,
    color: Option<String>,
    stock: i32,
    product_id: i32,
    product_name: String,
    price: Price,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            variant_id: VariantId::new(row.variant_id),
            quantity: row.quantity,
            sku: row.sku,
            size: row.size,
            color: row.color,
            stock: row.stock,
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            price: row.price,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the cart for an identity, without creating one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find(&self, identity: CartIdentity) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, session_token
            FROM carts
            WHERE ($1::integer IS NOT NULL AND user_id = $1)
               OR ($2::uuid IS NOT NULL AND session_token = $2)
            ORDER BY (user_id IS NOT NULL) DESC
            LIMIT 1
            ",
        )
        .bind(identity.user_id)
        .bind(identity.session_token)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.load_items(row).await?)),
            None => Ok(None),
        }
    }

    /// Find the cart for an identity, creating an empty one if none exists.
    ///
    /// A logged-in user's cart is created against their user ID; otherwise
    /// the cart is keyed by the session token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn get_or_create(&self, identity: CartIdentity) -> Result<Cart, RepositoryError> {
        if let Some(cart) = self.find(identity).await? {
            return Ok(cart);
        }

        let session_token = if identity.user_id.is_none() {
            identity.session_token
        } else {
            None
        };

        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (user_id, session_token)
            VALUES ($1, $2)
            RETURNING id, user_id, session_token
            ",
        )
        .bind(identity.user_id)
        .bind(session_token)
        .fetch_one(self.pool)
        .await?;

        self.load_items(row).await
    }

    /// Load a cart's lines with their variant and product data.
    async fn load_items(&self, row: CartRow) -> Result<Cart, RepositoryError> {
        let items = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.id, ci.variant_id, ci.quantity,
                   v.sku, v.size, v.color, v.stock,
                   p.id AS product_id, p.name AS product_name, p.price
            FROM cart_items ci
            JOIN product_variants v ON v.id = ci.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Cart {
            id: CartId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            session_token: row.session_token,
            items: items.into_iter().map(CartItem::from).collect(),
        })
    }

    /// Add `quantity` units of a variant to a cart.
    ///
    /// An existing line for the same variant is incremented by the requested
    /// amount; otherwise a new line is inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the variant doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<CartItemId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO cart_items (cart_id, variant_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, variant_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(cart_id)
        .bind(variant_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(CartItemId::new(id))
    }

    /// Set a line's quantity exactly.
    ///
    /// Returns `false` if the line doesn't belong to the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_item_quantity(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3
            WHERE id = $2 AND cart_id = $1
            ",
        )
        .bind(cart_id)
        .bind(item_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a line from a cart.
    ///
    /// Returns `false` if the line doesn't belong to the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND cart_id = $1")
            .bind(cart_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear_items(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Fold an anonymous session cart into a user's cart after login.
    ///
    /// If the user has no cart yet, the session cart is reassigned to them.
    /// Otherwise the session cart's lines are merged into the user's cart
    /// (summing quantities on variant collisions) and the session cart is
    /// deleted. No-op if the session has no cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn merge_into_user(
        &self,
        session_token: Uuid,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let session_cart: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM carts WHERE session_token = $1")
                .bind(session_token)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((session_cart_id,)) = session_cart else {
            return Ok(());
        };

        let user_cart: Option<(i32,)> = sqlx::query_as("SELECT id FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        match user_cart {
            None => {
                sqlx::query(
                    r"
                    UPDATE carts
                    SET user_id = $2, session_token = NULL, updated_at = NOW()
                    WHERE id = $1
                    ",
                )
                .bind(session_cart_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            }
            Some((user_cart_id,)) => {
                sqlx::query(
                    r"
                    INSERT INTO cart_items (cart_id, variant_id, quantity)
                    SELECT $2, variant_id, quantity
                    FROM cart_items
                    WHERE cart_id = $1
                    ON CONFLICT (cart_id, variant_id)
                    DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                    ",
                )
                .bind(session_cart_id)
                .bind(user_cart_id)
                .execute(&mut *tx)
                .await?;

                sqlx::query("DELETE FROM carts WHERE id = $1")
                    .bind(session_cart_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(())
    }
}

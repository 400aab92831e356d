//! Order repository: the checkout transaction and order queries.
//!
//! Placing an order is the one multi-step write in the system. Everything it
//! touches (address, order, order lines, stock decrements, payment record,
//! cart clearing) happens inside a single transaction and commits or rolls
//! back as a unit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use driftwood_core::{
    AddressId, OrderId, OrderItemId, OrderOwner, OrderStatus, PaymentId, PaymentStatus, Price,
    UserId, VariantId,
};

use super::RepositoryError;
use crate::models::cart::Cart;
use crate::models::order::{Address, Order, OrderItem, Payment, ShippingAddress};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// A variant's stock was below the ordered quantity at commit time.
    #[error("insufficient stock for {sku}")]
    InsufficientStock {
        /// SKU of the offending variant.
        sku: String,
    },

    /// Database failure; the transaction has been rolled back.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for PlaceOrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: Option<i32>,
    guest_email: Option<String>,
    guest_phone: Option<String>,
    guest_name: Option<String>,
    address_id: i32,
    total_amount: Decimal,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            guest_name: row.guest_name,
            address_id: AddressId::new(row.address_id),
            total_amount: row.total_amount,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for order line queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    variant_id: i32,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            variant_id: VariantId::new(row.variant_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    user_id: Option<i32>,
    street: String,
    city: String,
    state: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            user_id: row.user_id.map(UserId::new),
            street: row.street,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            country: row.country,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for payment queries.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: i32,
    order_id: i32,
    method: String,
    status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: PaymentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            method: row.method,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

const SELECT_ORDER: &str = r"
    SELECT id, user_id, guest_email, guest_phone, guest_name, address_id,
           total_amount, status, created_at, updated_at
    FROM orders
";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert a cart into a persisted order, atomically.
    ///
    /// Within one transaction:
    ///
    /// 1. Re-read each line's variant and product price (the authoritative
    ///    snapshot; the order total and every line price come from this same
    ///    read).
    /// 2. Create the address row, linked to the owner when authenticated.
    /// 3. Create the order row (`pending`, computed total).
    /// 4. Create the order lines and decrement each variant's stock with a
    ///    conditional write (`stock >= quantity` in the same statement); a
    ///    line that can't be covered fails the whole transaction.
    /// 5. Create the payment record when a method was given.
    /// 6. Clear the cart's lines.
    ///
    /// Any failure rolls everything back: no partial orders, no partial
    /// stock decrements.
    ///
    /// # Errors
    ///
    /// Returns `PlaceOrderError::InsufficientStock` naming the first SKU that
    /// can't be covered. Returns `PlaceOrderError::Repository` for database
    /// failures.
    pub async fn create_from_cart(
        &self,
        cart: &Cart,
        owner: &OrderOwner,
        shipping: &ShippingAddress,
        payment_method: Option<&str>,
        shipping_fee: Decimal,
    ) -> Result<Order, PlaceOrderError> {
        let mut tx = self.pool.begin().await?;

        // Authoritative price snapshot for every line, read inside the
        // transaction. The total and the line prices come from this one read.
        let mut lines = Vec::with_capacity(cart.items.len());
        let mut total = shipping_fee;
        for item in &cart.items {
            let (sku, price): (String, Price) = sqlx::query_as(
                r"
                SELECT v.sku, p.price
                FROM product_variants v
                JOIN products p ON p.id = v.product_id
                WHERE v.id = $1
                ",
            )
            .bind(item.variant_id)
            .fetch_one(&mut *tx)
            .await?;

            total += price.line_total(item.quantity);
            lines.push((item.variant_id, item.quantity, price, sku));
        }

        let (address_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO addresses (user_id, street, city, state, postal_code, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(owner.user_id())
        .bind(&shipping.street)
        .bind(&shipping.city)
        .bind(&shipping.state)
        .bind(&shipping.postal_code)
        .bind(&shipping.country)
        .fetch_one(&mut *tx)
        .await?;

        let (guest_email, guest_phone, guest_name) = match owner {
            OrderOwner::Authenticated { .. } => (None, None, None),
            OrderOwner::Guest { email, phone, name } => (
                Some(email.as_str().to_owned()),
                phone.clone(),
                Some(name.clone()),
            ),
        };

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, guest_email, guest_phone, guest_name,
                                address_id, total_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, guest_email, guest_phone, guest_name, address_id,
                      total_amount, status, created_at, updated_at
            ",
        )
        .bind(owner.user_id())
        .bind(guest_email)
        .bind(guest_phone)
        .bind(guest_name)
        .bind(address_id)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for (variant_id, quantity, price, sku) in lines {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, variant_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_row.id)
            .bind(variant_id)
            .bind(quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;

            // Conditional decrement: checking the floor in the same statement
            // closes the gap between the earlier stock validation and this
            // write. Zero rows affected means another order got there first.
            let result = sqlx::query(
                r"
                UPDATE product_variants
                SET stock = stock - $2
                WHERE id = $1 AND stock >= $2
                ",
            )
            .bind(variant_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                return Err(PlaceOrderError::InsufficientStock { sku });
            }
        }

        if let Some(method) = payment_method {
            sqlx::query("INSERT INTO payments (order_id, method) VALUES ($1, $2)")
                .bind(order_row.id)
                .bind(method)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Order::from(order_row))
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Order::from))
    }

    /// Get an order by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "{SELECT_ORDER} WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} ORDER BY created_at DESC"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order's lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, variant_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Get the shipping address snapshot for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_address(
        &self,
        address_id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, user_id, street, city, state, postal_code, country, created_at
            FROM addresses
            WHERE id = $1
            ",
        )
        .bind(address_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Get the payment record for an order, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_payment(&self, order_id: OrderId) -> Result<Option<Payment>, RepositoryError> {
        let row = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, order_id, method, status, created_at
            FROM payments
            WHERE order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Payment::from))
    }

    /// Overwrite an order's status, guarded on the expected current status.
    ///
    /// Returns the updated order, or `None` if the order no longer exists or
    /// its status changed since it was read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id, user_id, guest_email, guest_phone, guest_name, address_id,
                      total_amount, status, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Order::from))
    }
}

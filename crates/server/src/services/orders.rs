//! Order query service.
//!
//! Read-only order lookups (owner-scoped for customers, unscoped for admin)
//! and the admin status overwrite, guarded by the order status transition
//! table.

use sqlx::PgPool;
use thiserror::Error;

use driftwood_core::{OrderId, OrderStatus, UserId};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::order::{Order, OrderDetail};

/// Errors that can occur during order queries.
#[derive(Debug, Error)]
pub enum OrderQueryError {
    /// The order doesn't exist (or isn't visible to the caller).
    #[error("order not found")]
    NotFound,

    /// The requested status change isn't a legal transition.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order's status changed while the update was in flight.
    #[error("order status changed concurrently, re-read and retry")]
    StatusConflict,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order query service.
pub struct OrderQueryService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderQueryService<'a> {
    /// Create a new order query service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Get a user's order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::NotFound` if the order doesn't exist or
    /// belongs to someone else.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<OrderDetail, OrderQueryError> {
        let order = self
            .orders
            .get_for_user(id, user_id)
            .await?
            .ok_or(OrderQueryError::NotFound)?;
        let items = self.orders.get_items(order.id).await?;
        let address = self.orders.get_address(order.address_id).await?;
        let payment = self.orders.get_payment(order.id).await?;

        Ok(OrderDetail {
            order,
            items,
            address,
            payment,
        })
    }

    /// Get a user's order status.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::NotFound` if the order doesn't exist or
    /// belongs to someone else.
    pub async fn status_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<OrderStatus, OrderQueryError> {
        let order = self
            .orders
            .get_for_user(id, user_id)
            .await?
            .ok_or(OrderQueryError::NotFound)?;

        Ok(order.status)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::Repository` for database failures.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderQueryError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// List all orders, newest first. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::Repository` for database failures.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderQueryError> {
        Ok(self.orders.list_all().await?)
    }

    /// Get any order with its lines. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::NotFound` if the order doesn't exist.
    pub async fn get(&self, id: OrderId) -> Result<OrderDetail, OrderQueryError> {
        let order = self.orders.get(id).await?.ok_or(OrderQueryError::NotFound)?;
        let items = self.orders.get_items(order.id).await?;
        let address = self.orders.get_address(order.address_id).await?;
        let payment = self.orders.get_payment(order.id).await?;

        Ok(OrderDetail {
            order,
            items,
            address,
            payment,
        })
    }

    /// Move an order to a new status. Admin only.
    ///
    /// The write is guarded on the status the transition was validated
    /// against, so two admins racing on the same order can't skip a step.
    ///
    /// # Errors
    ///
    /// Returns `OrderQueryError::NotFound` if the order doesn't exist,
    /// `OrderQueryError::InvalidTransition` if the move isn't legal, and
    /// `OrderQueryError::StatusConflict` if the status changed underneath.
    pub async fn update_status(
        &self,
        id: OrderId,
        to: OrderStatus,
    ) -> Result<Order, OrderQueryError> {
        let current = self.orders.get(id).await?.ok_or(OrderQueryError::NotFound)?;

        if !current.status.can_transition_to(to) {
            return Err(OrderQueryError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        self.orders
            .update_status(id, current.status, to)
            .await?
            .ok_or(OrderQueryError::StatusConflict)
    }
}

//! Cart service.
//!
//! Owns cart lookup/creation, line add/update/remove, clearing, and the
//! merge of an anonymous cart into a user's cart at login.
//!
//! Stock is not checked here: a cart may hold any quantity, and sufficiency
//! is enforced at checkout (validation pre-flight plus the conditional
//! decrement at order placement).

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use driftwood_core::{CartItemId, UserId, VariantId};

use crate::db::{CartRepository, RepositoryError};
use crate::models::cart::{Cart, CartIdentity};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Referenced cart line or variant doesn't exist.
    #[error("not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What a quantity update means for a cart line.
///
/// Zero and negative quantities are removals, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateAction {
    Remove,
    Set(i32),
}

impl UpdateAction {
    const fn from_quantity(quantity: i32) -> Self {
        if quantity <= 0 {
            Self::Remove
        } else {
            Self::Set(quantity)
        }
    }
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
        }
    }

    /// Fetch the identity's cart, creating an empty one if none exists.
    ///
    /// The returned cart has its lines with variant and product data loaded,
    /// as required for price calculations downstream.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the lookup or creation fails.
    pub async fn get_or_create(&self, identity: CartIdentity) -> Result<Cart, CartError> {
        Ok(self.carts.get_or_create(identity).await?)
    }

    /// Add `quantity` units of a variant to the identity's cart.
    ///
    /// An existing line for the same variant is incremented by the requested
    /// amount (not overwritten). Returns the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::NotFound` if the variant doesn't exist.
    /// Returns `CartError::Repository` for database failures.
    pub async fn add_item(
        &self,
        identity: CartIdentity,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let cart = self.carts.get_or_create(identity).await?;
        self.carts
            .add_item(cart.id, variant_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::NotFound,
                other => CartError::Repository(other),
            })?;

        self.get_or_create(identity).await
    }

    /// Set a line's quantity exactly; zero or negative removes the line.
    ///
    /// Returns the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the line doesn't belong to the
    /// identity's cart. Returns `CartError::Repository` for database
    /// failures.
    pub async fn update_item(
        &self,
        identity: CartIdentity,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        let cart = self.carts.get_or_create(identity).await?;

        let touched = match UpdateAction::from_quantity(quantity) {
            UpdateAction::Remove => self.carts.delete_item(cart.id, item_id).await?,
            UpdateAction::Set(quantity) => {
                self.carts
                    .set_item_quantity(cart.id, item_id, quantity)
                    .await?
            }
        };

        if !touched {
            return Err(CartError::NotFound);
        }

        self.get_or_create(identity).await
    }

    /// Remove a line from the identity's cart.
    ///
    /// Returns the refreshed cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the line doesn't belong to the
    /// identity's cart. Returns `CartError::Repository` for database
    /// failures.
    pub async fn remove_item(
        &self,
        identity: CartIdentity,
        item_id: CartItemId,
    ) -> Result<Cart, CartError> {
        let cart = self.carts.get_or_create(identity).await?;

        if !self.carts.delete_item(cart.id, item_id).await? {
            return Err(CartError::NotFound);
        }

        self.get_or_create(identity).await
    }

    /// Delete all lines from the identity's cart.
    ///
    /// No-op (not an error) if the identity has no cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` for database failures.
    pub async fn clear(&self, identity: CartIdentity) -> Result<(), CartError> {
        if let Some(cart) = self.carts.find(identity).await? {
            self.carts.clear_items(cart.id).await?;
        }

        Ok(())
    }

    /// Fold the session's anonymous cart into the user's cart after login.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` for database failures.
    pub async fn merge_on_login(
        &self,
        session_token: Uuid,
        user_id: UserId,
    ) -> Result<(), CartError> {
        Ok(self.carts.merge_into_user(session_token, user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_negative_quantities_remove() {
        assert_eq!(UpdateAction::from_quantity(0), UpdateAction::Remove);
        assert_eq!(UpdateAction::from_quantity(-1), UpdateAction::Remove);
        assert_eq!(UpdateAction::from_quantity(-100), UpdateAction::Remove);
    }

    #[test]
    fn test_positive_quantity_sets_exactly() {
        assert_eq!(UpdateAction::from_quantity(1), UpdateAction::Set(1));
        assert_eq!(UpdateAction::from_quantity(12), UpdateAction::Set(12));
    }
}

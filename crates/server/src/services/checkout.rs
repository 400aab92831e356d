//! Checkout service: cart validation, totals, and order placement.
//!
//! The pre-flight operations (`load_checkout`, `validate`, `calculate`) are
//! pure reads; their results can be stale by the time the order is placed.
//! The placement itself re-reads prices and re-checks stock inside the order
//! transaction, so a stale pre-flight can only produce a clean failure,
//! never a partial write.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use driftwood_core::{Email, EmailError, OrderOwner, OwnerError};

use crate::db::{OrderRepository, PlaceOrderError, RepositoryError};
use crate::models::cart::{Cart, CartIdentity};
use crate::models::order::{Order, ShippingAddress};
use crate::services::cart::{CartError, CartService};

/// Flat shipping fee applied to every order, in the store currency.
const FLAT_SHIPPING_FEE_CENTS: i64 = 30_00;

/// The flat shipping fee as a decimal amount.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(FLAT_SHIPPING_FEE_CENTS, 2)
}

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The shipping address is missing required fields.
    #[error("invalid address: {0}")]
    InvalidAddress(&'static str),

    /// A variant's stock is below the requested quantity.
    #[error("insufficient stock for {sku}")]
    InsufficientStock {
        /// SKU of the offending variant.
        sku: String,
    },

    /// Guest contact email failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Order ownership could not be resolved.
    #[error(transparent)]
    Owner(#[from] OwnerError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<CartError> for CheckoutError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::Repository(inner) => Self::Repository(inner),
            // Cart lookups during checkout never take quantities or line IDs.
            CartError::InvalidQuantity | CartError::NotFound => Self::EmptyCart,
        }
    }
}

/// Cart totals: subtotal, flat shipping, and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Order placement input, as submitted by the client.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub guest_name: Option<String>,
}

// =============================================================================
// Pure checkout rules
// =============================================================================

/// Compute totals over a loaded cart using live line prices.
#[must_use]
pub fn compute_totals(cart: &Cart) -> CartTotals {
    let subtotal: Decimal = cart
        .items
        .iter()
        .map(|item| item.price.line_total(item.quantity))
        .sum();
    let shipping = shipping_fee();

    CartTotals {
        subtotal,
        shipping,
        total: subtotal + shipping,
    }
}

/// Validate the address for the pre-flight check: street and city required.
fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    if address.street.trim().is_empty() {
        return Err(CheckoutError::InvalidAddress("street is required"));
    }
    if address.city.trim().is_empty() {
        return Err(CheckoutError::InvalidAddress("city is required"));
    }
    Ok(())
}

/// Validate the address for placement: only the street is required here.
fn require_street(address: &ShippingAddress) -> Result<(), CheckoutError> {
    if address.street.trim().is_empty() {
        return Err(CheckoutError::InvalidAddress("street is required"));
    }
    Ok(())
}

/// Check every line against the stock read with the cart, failing fast on
/// the first variant that can't cover its requested quantity.
fn check_stock(cart: &Cart) -> Result<(), CheckoutError> {
    for item in &cart.items {
        if item.stock < item.quantity {
            return Err(CheckoutError::InsufficientStock {
                sku: item.sku.clone(),
            });
        }
    }
    Ok(())
}

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    carts: CartService<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            carts: CartService::new(pool),
        }
    }

    /// Load the checkout snapshot of the identity's cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::Repository` for database failures.
    pub async fn load_checkout(&self, identity: CartIdentity) -> Result<Cart, CheckoutError> {
        let cart = self.carts.get_or_create(identity).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(cart)
    }

    /// Pre-flight validation of the cart against a shipping address.
    ///
    /// Pure read; stock may change between this check and placement, which
    /// is why placement re-checks with a conditional decrement.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart`, `CheckoutError::InvalidAddress`,
    /// or `CheckoutError::InsufficientStock` naming the first offending SKU.
    pub async fn validate(
        &self,
        identity: CartIdentity,
        address: &ShippingAddress,
    ) -> Result<(), CheckoutError> {
        let cart = self.load_checkout(identity).await?;
        validate_address(address)?;
        check_stock(&cart)
    }

    /// Compute the identity's cart totals at current prices.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::Repository` for database failures.
    pub async fn calculate(&self, identity: CartIdentity) -> Result<CartTotals, CheckoutError> {
        let cart = self.load_checkout(identity).await?;
        Ok(compute_totals(&cart))
    }

    /// Convert the identity's cart into a persisted order.
    ///
    /// The heavy lifting happens in [`OrderRepository::create_from_cart`]:
    /// one transaction covering the address, the order, its lines (with
    /// prices re-read inside the transaction), guarded stock decrements, the
    /// optional payment record, and clearing the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart,
    /// `CheckoutError::InvalidAddress` for a missing street,
    /// `CheckoutError::Owner`/`CheckoutError::InvalidEmail` when neither a
    /// user nor valid guest contact details are present, and
    /// `CheckoutError::InsufficientStock` when a line can't be covered at
    /// commit time.
    pub async fn place_order(
        &self,
        identity: CartIdentity,
        input: PlaceOrder,
    ) -> Result<Order, CheckoutError> {
        let cart = self.load_checkout(identity).await?;
        require_street(&input.shipping_address)?;

        let guest_email = input.email.as_deref().map(Email::parse).transpose()?;
        let owner = OrderOwner::resolve(
            identity.user_id,
            guest_email,
            input.phone_number,
            input.guest_name,
        )?;

        let order = OrderRepository::new(self.pool)
            .create_from_cart(
                &cart,
                &owner,
                &input.shipping_address,
                input.payment_method.as_deref(),
                shipping_fee(),
            )
            .await
            .map_err(|e| match e {
                PlaceOrderError::InsufficientStock { sku } => {
                    CheckoutError::InsufficientStock { sku }
                }
                PlaceOrderError::Repository(inner) => CheckoutError::Repository(inner),
            })?;

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use driftwood_core::{CartId, CartItemId, Price, ProductId, VariantId};

    use super::*;
    use crate::models::cart::CartItem;

    fn item(quantity: i32, stock: i32, price_cents: i64, sku: &str) -> CartItem {
        CartItem {
            id: CartItemId::new(1),
            variant_id: VariantId::new(1),
            quantity,
            sku: sku.to_owned(),
            size: "M".to_owned(),
            color: None,
            stock,
            product_id: ProductId::new(1),
            product_name: "Tide Shirt".to_owned(),
            price: Price::new(Decimal::new(price_cents, 2)).unwrap(),
        }
    }

    fn cart(items: Vec<CartItem>) -> Cart {
        Cart {
            id: CartId::new(1),
            user_id: None,
            session_token: None,
            items,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "1 Harbor Way".to_owned(),
            city: "Port Haven".to_owned(),
            state: None,
            postal_code: None,
            country: None,
        }
    }

    #[test]
    fn test_totals_worked_example() {
        // One line: 2 units at $50.00, flat $30.00 shipping.
        let cart = cart(vec![item(2, 3, 50_00, "SHIRT-M")]);
        let totals = compute_totals(&cart);

        assert_eq!(totals.subtotal, Decimal::new(100_00, 2));
        assert_eq!(totals.shipping, Decimal::new(30_00, 2));
        assert_eq!(totals.total, Decimal::new(130_00, 2));
    }

    #[test]
    fn test_totals_sum_over_lines() {
        let cart = cart(vec![
            item(1, 5, 19_99, "A"),
            item(3, 5, 5_00, "B"),
        ]);
        let totals = compute_totals(&cart);

        assert_eq!(totals.subtotal, Decimal::new(34_99, 2));
        assert_eq!(totals.total, totals.subtotal + shipping_fee());
    }

    #[test]
    fn test_totals_empty_cart_is_shipping_only() {
        // The service rejects empty carts before computing; the arithmetic
        // itself degrades to the flat fee.
        let totals = compute_totals(&cart(vec![]));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, shipping_fee());
    }

    #[test]
    fn test_validate_address_requires_street_and_city() {
        assert!(validate_address(&address()).is_ok());

        let mut missing_street = address();
        missing_street.street = "  ".to_owned();
        assert!(matches!(
            validate_address(&missing_street),
            Err(CheckoutError::InvalidAddress("street is required"))
        ));

        let mut missing_city = address();
        missing_city.city = String::new();
        assert!(matches!(
            validate_address(&missing_city),
            Err(CheckoutError::InvalidAddress("city is required"))
        ));
    }

    #[test]
    fn test_placement_only_requires_street() {
        let mut no_city = address();
        no_city.city = String::new();
        assert!(require_street(&no_city).is_ok());
    }

    #[test]
    fn test_check_stock_passes_when_covered() {
        let cart = cart(vec![item(2, 3, 50_00, "SHIRT-M")]);
        assert!(check_stock(&cart).is_ok());
    }

    #[test]
    fn test_check_stock_fails_fast_naming_sku() {
        let cart = cart(vec![
            item(1, 1, 10_00, "OK-SKU"),
            item(5, 2, 10_00, "FIRST-SHORT"),
            item(9, 0, 10_00, "ALSO-SHORT"),
        ]);

        match check_stock(&cart) {
            Err(CheckoutError::InsufficientStock { sku }) => assert_eq!(sku, "FIRST-SHORT"),
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_stock_is_sufficient() {
        let cart = cart(vec![item(3, 3, 10_00, "EXACT")]);
        assert!(check_stock(&cart).is_ok());
    }
}

//! Cart domain types.

use serde::Serialize;
use uuid::Uuid;

use driftwood_core::{CartId, CartItemId, Price, ProductId, UserId, VariantId};

/// The identity a cart is looked up by: an authenticated user, an anonymous
/// session token, or both (a logged-in user whose session still carries a
/// token from before login).
///
/// Resolution is a logical OR; a cart matches if it belongs to the user or to
/// the session token.
#[derive(Debug, Clone, Copy)]
pub struct CartIdentity {
    /// The authenticated user, if any.
    pub user_id: Option<UserId>,
    /// The anonymous session's cart token, if any.
    pub session_token: Option<Uuid>,
}

/// A line in a cart, with the variant and product data needed for display
/// and price calculations eagerly loaded.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub variant_id: VariantId,
    pub quantity: i32,
    pub sku: String,
    pub size: String,
    pub color: Option<String>,
    /// Stock on hand for the variant at read time.
    pub stock: i32,
    pub product_id: ProductId,
    pub product_name: String,
    /// Live product price at read time.
    pub price: Price,
}

/// A shopping cart with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub session_token: Option<Uuid>,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

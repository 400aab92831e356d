//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use driftwood_core::{
    AddressId, OrderId, OrderItemId, OrderStatus, PaymentId, PaymentStatus, UserId, VariantId,
};

/// A shipping address as submitted at checkout.
///
/// Only `street` and `city` are required; the rest is passed through to the
/// carrier as provided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// A persisted shipping address snapshot.
///
/// Created fresh per order; never deduplicated.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub id: AddressId,
    pub user_id: Option<UserId>,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A placed order.
///
/// Immutable once created except for `status`.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub guest_name: Option<String>,
    pub address_id: AddressId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line of a placed order.
///
/// `price` is the product price captured inside the order transaction, not a
/// live reference to the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub variant_id: VariantId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A payment record attached to an order.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub method: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

/// An order with its lines, shipping address, and payment record, for
/// detail responses.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub address: Option<Address>,
    pub payment: Option<Payment>,
}

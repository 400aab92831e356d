//! Checkout route handlers.

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::cart::CartIdentity;
use crate::models::order::ShippingAddress;
use crate::response::{created, ok, ok_message};
use crate::services::checkout::{CheckoutService, PlaceOrder};
use crate::state::AppState;

/// Pre-flight validation request body.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub shipping_address: ShippingAddress,
}

/// Order placement request body.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub guest_name: Option<String>,
}

/// Load the checkout snapshot of the cart.
#[instrument(skip(state, identity))]
pub async fn session(State(state): State<AppState>, identity: CartIdentity) -> Result<Response> {
    let cart = CheckoutService::new(state.pool())
        .load_checkout(identity)
        .await?;
    Ok(ok(cart))
}

/// Pre-flight validation of the cart and shipping address.
///
/// A passing result can be stale by placement time; the order transaction
/// re-checks stock with a conditional decrement.
#[instrument(skip(state, identity, body))]
pub async fn validate(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<ValidateRequest>,
) -> Result<Response> {
    CheckoutService::new(state.pool())
        .validate(identity, &body.shipping_address)
        .await?;
    Ok(ok_message("cart is ready for checkout"))
}

/// Compute cart totals at current prices.
#[instrument(skip(state, identity))]
pub async fn calculate(State(state): State<AppState>, identity: CartIdentity) -> Result<Response> {
    let totals = CheckoutService::new(state.pool()).calculate(identity).await?;
    Ok(ok(totals))
}

/// Place the order.
#[instrument(skip(state, identity, body))]
pub async fn place_order(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<Response> {
    let order = CheckoutService::new(state.pool())
        .place_order(
            identity,
            PlaceOrder {
                shipping_address: body.shipping_address,
                payment_method: body.payment_method,
                email: body.email,
                phone_number: body.phone_number,
                guest_name: body.guest_name,
            },
        )
        .await?;
    Ok(created(order))
}

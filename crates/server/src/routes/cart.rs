//! Cart route handlers.
//!
//! Every mutation responds with the refreshed cart so the client never needs
//! a follow-up read.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use tracing::instrument;

use driftwood_core::{CartItemId, VariantId};

use crate::error::Result;
use crate::models::cart::CartIdentity;
use crate::response::{created, ok, ok_message};
use crate::services::cart::CartService;
use crate::state::AppState;

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub variant_id: VariantId,
    pub quantity: i32,
}

/// Update cart item request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

/// Fetch (or lazily create) the cart for the current identity.
#[instrument(skip(state, identity))]
pub async fn show(State(state): State<AppState>, identity: CartIdentity) -> Result<Response> {
    let cart = CartService::new(state.pool()).get_or_create(identity).await?;
    Ok(ok(cart))
}

/// Add an item to the cart.
#[instrument(skip(state, identity))]
pub async fn add_item(
    State(state): State<AppState>,
    identity: CartIdentity,
    Json(body): Json<AddItemRequest>,
) -> Result<Response> {
    let cart = CartService::new(state.pool())
        .add_item(identity, body.variant_id, body.quantity)
        .await?;
    Ok(created(cart))
}

/// Set an item's quantity; zero or negative removes it.
#[instrument(skip(state, identity))]
pub async fn update_item(
    State(state): State<AppState>,
    identity: CartIdentity,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Response> {
    let cart = CartService::new(state.pool())
        .update_item(identity, item_id, body.quantity)
        .await?;
    Ok(ok(cart))
}

/// Remove an item from the cart.
#[instrument(skip(state, identity))]
pub async fn remove_item(
    State(state): State<AppState>,
    identity: CartIdentity,
    Path(item_id): Path<CartItemId>,
) -> Result<Response> {
    let cart = CartService::new(state.pool())
        .remove_item(identity, item_id)
        .await?;
    Ok(ok(cart))
}

/// Clear all items from the cart.
#[instrument(skip(state, identity))]
pub async fn clear(State(state): State<AppState>, identity: CartIdentity) -> Result<Response> {
    CartService::new(state.pool()).clear(identity).await?;
    Ok(ok_message("cart cleared"))
}

//! Customer order route handlers.
//!
//! All lookups are scoped to the logged-in user; an order belonging to
//! someone else is indistinguishable from one that doesn't exist.

use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::json;
use tracing::instrument;

use driftwood_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::response::ok;
use crate::services::orders::OrderQueryService;
use crate::state::AppState;

/// List the user's orders, newest first.
#[instrument(skip(state, user))]
pub async fn index(State(state): State<AppState>, RequireUser(user): RequireUser) -> Result<Response> {
    let orders = OrderQueryService::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(ok(orders))
}

/// Get one of the user's orders with its lines.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(order_id): Path<OrderId>,
) -> Result<Response> {
    let order = OrderQueryService::new(state.pool())
        .get_for_user(order_id, user.id)
        .await?;
    Ok(ok(order))
}

/// Get one of the user's orders' status.
#[instrument(skip(state, user))]
pub async fn status(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(order_id): Path<OrderId>,
) -> Result<Response> {
    let status = OrderQueryService::new(state.pool())
        .status_for_user(order_id, user.id)
        .await?;
    Ok(ok(json!({ "status": status })))
}

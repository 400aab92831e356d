//! Category route handlers.

use axum::extract::State;
use axum::response::Response;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::response::ok;
use crate::state::AppState;

/// List all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let categories = ProductRepository::new(state.pool()).list_categories().await?;
    Ok(ok(categories))
}

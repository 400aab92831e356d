//! Collection route handlers.

use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::json;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::response::ok;
use crate::state::AppState;

/// List all collections.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let collections = ProductRepository::new(state.pool()).list_collections().await?;
    Ok(ok(collections))
}

/// Get a collection and its products by slug.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let (collection, products) = ProductRepository::new(state.pool())
        .get_collection_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection '{slug}'")))?;

    Ok(ok(json!({
        "collection": collection,
        "products": products,
    })))
}

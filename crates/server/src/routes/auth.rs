//! Auth route handlers.
//!
//! Login and registration establish the session user and fold any anonymous
//! cart the session was carrying into the user's cart.

use axum::Json;
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::session::{CurrentUser, keys};
use crate::models::user::User;
use crate::response::{created, ok, ok_message};
use crate::services::auth::AuthService;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Register/login request body.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Store the user in the session and absorb any anonymous cart.
async fn establish_session(state: &AppState, session: &Session, user: &User) -> Result<()> {
    let cart_token: Option<Uuid> = session.get(keys::CART_TOKEN).await.ok().flatten();

    if let Some(token) = cart_token {
        CartService::new(state.pool())
            .merge_on_login(token, user.id)
            .await?;

        // The cart is keyed by the user from here on.
        let _ = session.remove::<Uuid>(keys::CART_TOKEN).await;
    }

    session
        .insert(
            keys::CURRENT_USER,
            CurrentUser {
                id: user.id,
                email: user.email.clone(),
            },
        )
        .await
        .map_err(|e| AppError::Internal(format!("session store unavailable: {e}")))?;

    Ok(())
}

/// Register a new account.
#[instrument(skip(state, session, body))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;

    establish_session(&state, &session, &user).await?;

    Ok(created(user))
}

/// Login with email and password.
#[instrument(skip(state, session, body))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    establish_session(&state, &session, &user).await?;

    Ok(ok(user))
}

/// Logout: drop the whole session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session store unavailable: {e}")))?;

    Ok(ok_message("logged out"))
}

//! Identity extraction and admin gating.
//!
//! Provides the cart identity extractor (user or anonymous session token),
//! an extractor requiring a logged-in user, and the admin-token middleware.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use secrecy::ExposeSecret;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::cart::CartIdentity;
use crate::models::session::{CurrentUser, keys};
use crate::state::AppState;

/// Rejection when no cart identity can be established.
pub struct IdentityRejection;

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        AppError::Unauthorized("no cart identity".to_owned()).into_response()
    }
}

impl<S> FromRequestParts<S> for CartIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(IdentityRejection)?;

        let user: Option<CurrentUser> = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten();

        let session_token: Option<Uuid> = session.get(keys::CART_TOKEN).await.ok().flatten();

        let identity = Self {
            user_id: user.map(|u| u.id),
            session_token,
        };

        // The session cookie is issued upstream; if it carries neither a
        // user nor a cart token, there is nothing to key a cart on.
        if identity.user_id.is_none() && identity.session_token.is_none() {
            return Err(IdentityRejection);
        }

        Ok(identity)
    }
}

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Orders for {}", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            AppError::Unauthorized("login required".to_owned()).into_response()
        })?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AppError::Unauthorized("login required".to_owned()).into_response())?;

        Ok(Self(user))
    }
}

/// Mint a cart token into the session on first touch.
///
/// Layered on the cart and checkout routes so that anonymous visitors get a
/// durable cart identity before the extractor runs. Logged-in users don't
/// need one.
pub async fn provision_cart_token(session: Session, request: Request, next: Next) -> Response {
    let has_user = session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .is_some();

    if !has_user {
        let has_token = session
            .get::<Uuid>(keys::CART_TOKEN)
            .await
            .ok()
            .flatten()
            .is_some();

        if !has_token
            && let Err(e) = session.insert(keys::CART_TOKEN, Uuid::new_v4()).await
        {
            tracing::error!("Failed to provision cart token: {e}");
            return AppError::Internal("session store unavailable".to_owned()).into_response();
        }
    }

    next.run(request).await
}

/// Gate the admin surface behind the configured admin token.
///
/// Accepts `Authorization: Bearer <token>`. Token management and rotation
/// are an operational concern outside this service.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == state.config().admin_token.expose_secret() => {
            next.run(request).await
        }
        Some(_) => AppError::Unauthorized("invalid admin token".to_owned()).into_response(),
        None => AppError::Unauthorized("admin token required".to_owned()).into_response(),
    }
}

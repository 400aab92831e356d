//! HTTP middleware: sessions, identity extraction, admin gating.

pub mod auth;
pub mod session;

pub use auth::{RequireUser, provision_cart_token, require_admin};
pub use session::create_session_layer;

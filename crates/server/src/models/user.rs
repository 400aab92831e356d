//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use driftwood_core::{Email, UserId};

/// A registered storefront account.
///
/// The password hash never leaves the repository layer; handlers only ever
/// see this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

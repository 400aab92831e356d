//! Order ownership.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// Errors that can occur when resolving an [`OrderOwner`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum OwnerError {
    /// A guest order needs a contact email.
    #[error("guest orders require a contact email")]
    MissingGuestEmail,
    /// A guest order needs a contact name.
    #[error("guest orders require a contact name")]
    MissingGuestName,
}

/// Who an order belongs to: a registered user, or a guest identified by the
/// contact details captured at checkout.
///
/// Exactly one of the two shapes exists per order. Constructing through
/// [`OrderOwner::resolve`] enforces that: an authenticated user wins over any
/// guest fields sent alongside, and a guest order without contact details is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderOwner {
    /// A registered user placed the order.
    Authenticated {
        /// The user's ID.
        user_id: UserId,
    },
    /// A guest placed the order.
    Guest {
        /// Contact email for order updates.
        email: Email,
        /// Optional contact phone number.
        phone: Option<String>,
        /// Name to address the guest by.
        name: String,
    },
}

impl OrderOwner {
    /// Resolve the owner from an optional authenticated user and the guest
    /// contact fields submitted with the order.
    ///
    /// # Errors
    ///
    /// Returns `OwnerError` if no user is present and the guest email or
    /// name is missing.
    pub fn resolve(
        user_id: Option<UserId>,
        guest_email: Option<Email>,
        guest_phone: Option<String>,
        guest_name: Option<String>,
    ) -> Result<Self, OwnerError> {
        if let Some(user_id) = user_id {
            return Ok(Self::Authenticated { user_id });
        }

        let email = guest_email.ok_or(OwnerError::MissingGuestEmail)?;
        let name = match guest_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(OwnerError::MissingGuestName),
        };

        Ok(Self::Guest {
            email,
            phone: guest_phone,
            name,
        })
    }

    /// The user ID, when the order belongs to a registered user.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Authenticated { user_id } => Some(*user_id),
            Self::Guest { .. } => None,
        }
    }

    /// Whether this is a guest order.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_wins_over_guest_fields() {
        let owner = OrderOwner::resolve(
            Some(UserId::new(1)),
            Some(Email::parse("guest@example.com").unwrap()),
            Some("555-0100".to_owned()),
            Some("Guest".to_owned()),
        )
        .unwrap();

        assert_eq!(owner.user_id(), Some(UserId::new(1)));
        assert!(!owner.is_guest());
    }

    #[test]
    fn test_guest_requires_email() {
        let result = OrderOwner::resolve(None, None, None, Some("Guest".to_owned()));
        assert!(matches!(result, Err(OwnerError::MissingGuestEmail)));
    }

    #[test]
    fn test_guest_requires_name() {
        let email = Email::parse("guest@example.com").unwrap();
        let result = OrderOwner::resolve(None, Some(email.clone()), None, None);
        assert!(matches!(result, Err(OwnerError::MissingGuestName)));

        let result = OrderOwner::resolve(None, Some(email), None, Some("   ".to_owned()));
        assert!(matches!(result, Err(OwnerError::MissingGuestName)));
    }

    #[test]
    fn test_guest_owner_carries_contact() {
        let owner = OrderOwner::resolve(
            None,
            Some(Email::parse("guest@example.com").unwrap()),
            None,
            Some("Guest Shopper".to_owned()),
        )
        .unwrap();

        assert!(owner.is_guest());
        assert_eq!(owner.user_id(), None);
        match owner {
            OrderOwner::Guest { email, phone, name } => {
                assert_eq!(email.as_str(), "guest@example.com");
                assert_eq!(phone, None);
                assert_eq!(name, "Guest Shopper");
            }
            OrderOwner::Authenticated { .. } => panic!("expected guest"),
        }
    }
}

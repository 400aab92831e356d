//! Business logic services.
//!
//! Services orchestrate the repositories in [`crate::db`] and own the
//! business rules; route handlers stay thin. Each service borrows the shared
//! connection pool and is constructed per request.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;

pub use auth::AuthService;
pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService};
pub use orders::{OrderQueryError, OrderQueryService};

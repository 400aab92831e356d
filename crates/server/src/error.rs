//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::orders::OrderQueryError;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Order query failed.
    #[error("order error: {0}")]
    Order(#[from] OrderQueryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Cart(err) => match err {
                CartError::InvalidQuantity => StatusCode::BAD_REQUEST,
                CartError::NotFound => StatusCode::NOT_FOUND,
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Order(err) => match err {
                OrderQueryError::NotFound => StatusCode::NOT_FOUND,
                OrderQueryError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
                OrderQueryError::StatusConflict => StatusCode::CONFLICT,
                OrderQueryError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) | AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details never leak.
    fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            return "Internal server error".to_owned();
        }

        match self {
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_owned()
                }
                other => other.to_string(),
            },
            Self::Database(RepositoryError::NotFound) => "not found".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Capture server faults to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let envelope = if status.is_server_error() {
            ApiResponse::error(self.client_message())
        } else {
            ApiResponse::fail(self.client_message())
        };

        (status, Json(envelope)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_business_failures_are_4xx() {
        assert_eq!(
            AppError::Checkout(CheckoutError::EmptyCart).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::InsufficientStock {
                sku: "SHIRT-M".to_owned()
            })
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Cart(CartError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("no identity".to_owned()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_repository_failures_are_5xx() {
        // A wrapped repository error inside checkout is still a server fault.
        let err = AppError::Checkout(CheckoutError::Repository(RepositoryError::DataCorruption(
            "bad row".to_owned(),
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("connection pool exhausted at 10.0.0.3".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_stock_failure_names_sku() {
        let err = AppError::Checkout(CheckoutError::InsufficientStock {
            sku: "SHIRT-M".to_owned(),
        });
        assert!(err.client_message().contains("SHIRT-M"));
    }
}

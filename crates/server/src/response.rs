//! Uniform response envelope.
//!
//! Every JSON endpoint responds with the same shape:
//!
//! ```json
//! {"status": "success", "data": {...}}
//! {"status": "fail", "message": "cart is empty"}
//! {"status": "error", "message": "Internal server error"}
//! ```
//!
//! `fail` marks a request the client can fix (4xx); `error` marks a fault on
//! our side (5xx).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope status discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

/// The uniform response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A success envelope carrying data.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    /// A success envelope with a message and no data.
    #[must_use]
    pub fn success_message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            data: None,
            message: Some(message.into()),
        }
    }

    /// A `fail` envelope (client-correctable) with a message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            data: None,
            message: Some(message.into()),
        }
    }

    /// An `error` envelope (server fault) with a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// 200 OK with a success envelope.
pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

/// 200 OK with a message-only success envelope.
pub fn ok_message(message: impl Into<String>) -> Response {
    (StatusCode::OK, Json(ApiResponse::success_message(message))).into_response()
}

/// 201 Created with a success envelope.
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = ApiResponse::success(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "success", "data": {"id": 1}})
        );
    }

    #[test]
    fn test_fail_envelope_omits_data() {
        let envelope = ApiResponse::fail("cart is empty");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "fail", "message": "cart is empty"})
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = ApiResponse::error("Internal server error");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], "error");
    }
}

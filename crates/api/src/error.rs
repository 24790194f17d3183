//! API error types and handling
//!
//! The response bodies here are the service's public contract: credential and
//! validation failures answer `{success: false, message}`, while the request
//! gates answer `{auth_error: <code>, message}` so clients can tell the two
//! apart without parsing prose.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use chatline_shared::StoreError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // Client input
    #[error("Validation error: {0}")]
    Validation(&'static str),
    #[error("Email already in use")]
    EmailInUse,

    // Credential failures
    #[error("Authentication rejected: {0}")]
    AuthRejected(&'static str),

    // Gate failures
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Already authenticated")]
    AlreadyAuthenticated,

    // Internal failures; detail is logged server-side, never returned
    #[error("Registration failed")]
    RegistrationFailed,
    #[error("Login failed")]
    LoginFailed,
    #[error("Logout failed")]
    LogoutFailed,
    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "message": msg}),
            ),
            ApiError::EmailInUse => (
                StatusCode::CONFLICT,
                json!({"success": false, "message": "Email already in use."}),
            ),
            ApiError::AuthRejected(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "message": msg}),
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({"auth_error": 1, "message": "user is not authenticated"}),
            ),
            ApiError::AlreadyAuthenticated => (
                StatusCode::FORBIDDEN,
                json!({"auth_error": 0, "message": "user is already authenticated"}),
            ),
            ApiError::RegistrationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "message": "Server error when registering user."}),
            ),
            ApiError::LoginFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "message": "Error logging in."}),
            ),
            ApiError::LogoutFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"auth_error": 2, "message": "error logging out"}),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "message": "Internal server error."}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ApiError::EmailInUse,
            StoreError::Unavailable(detail) => {
                tracing::error!(error = %detail, "storage failure");
                ApiError::Database(detail)
            }
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_failures_carry_distinct_codes() {
        let unauth = ApiError::Unauthenticated.into_response();
        assert_eq!(unauth.status(), StatusCode::UNAUTHORIZED);

        let already = ApiError::AlreadyAuthenticated.into_response();
        assert_eq!(already.status(), StatusCode::FORBIDDEN);

        let logout = ApiError::LogoutFailed.into_response();
        assert_eq!(logout.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_conflict_maps_to_email_in_use() {
        let err: ApiError = StoreError::Conflict.into();
        assert!(matches!(err, ApiError::EmailInUse));

        let err: ApiError = StoreError::Unavailable("connection refused".into()).into();
        assert!(matches!(err, ApiError::Database(_)));
    }
}

//! Authentication routes

use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use chatline_shared::{StoreError, User};

use crate::{
    auth::middleware::{clear_session_cookie, session_cookie, session_token},
    auth::password::hash_password,
    auth::strategy::{AuthOutcome, AuthUser, RejectReason},
    error::{ApiError, ApiResult},
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user and log them in
///
/// Validation applies one rule at a time and reports the first failure; the
/// insert itself is the authoritative duplicate-email check. On success the
/// credential strategy runs exactly as it does for login, so registration
/// ends with an established session.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    if let Some(msg) = identity_error(&req.first_name, &req.last_name, &req.email) {
        return Err(ApiError::Validation(msg));
    }

    // Advisory duplicate check, kept ahead of the password rules so the user
    // hears about a taken email before being asked to fix their password.
    // The insert below remains the authoritative check.
    let existing = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "duplicate-email lookup failed");
            ApiError::RegistrationFailed
        })?;
    if existing.is_some() {
        return Err(ApiError::EmailInUse);
    }

    if let Some(msg) = password_error(&req.password) {
        return Err(ApiError::Validation(msg));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::RegistrationFailed
    })?;

    let user = User {
        id: Uuid::new_v4(),
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        password_hash,
    };

    match state.users.insert(&user).await {
        Ok(()) => {}
        Err(StoreError::Conflict) => return Err(ApiError::EmailInUse),
        Err(StoreError::Unavailable(detail)) => {
            tracing::error!(error = %detail, "user insert failed");
            return Err(ApiError::RegistrationFailed);
        }
    }

    tracing::info!(user_id = %user.id, "user registered");

    // Auto-login: run the same strategy a plain login would
    establish_session(&state, &user.email, &req.password).await
}

/// Login with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    establish_session(&state, &req.email, &req.password).await
}

/// Destroy the current session and clear the cookie
///
/// Carrying no session is not an error; the response is the same either way.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(token) = session_token(&headers) {
        state.sessions.destroy(&token).await.map_err(|e| {
            tracing::error!(error = %e, "session destroy failed");
            ApiError::LogoutFailed
        })?;
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Json(StatusResponse {
            success: true,
            message: None,
        }),
    ))
}

/// The authenticated user's own profile, password hash stripped
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    })
}

/// Minimal gated probe route
pub async fn tester() -> Json<serde_json::Value> {
    Json(json!({"hello": "world"}))
}

// =============================================================================
// Session establishment
// =============================================================================

/// Run the credential strategy and, on success, persist a session and attach
/// its cookie to the response.
async fn establish_session(state: &AppState, email: &str, password: &str) -> ApiResult<Response> {
    match state
        .authenticator
        .authenticate(&state.users, email, password)
        .await
    {
        AuthOutcome::Authenticated(user) => {
            let token = state.sessions.create(&user.email).await.map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "session create failed");
                ApiError::LoginFailed
            })?;

            tracing::info!(user_id = %user.id, "user logged in");

            Ok((
                AppendHeaders([(header::SET_COOKIE, session_cookie(&token))]),
                Json(StatusResponse {
                    success: true,
                    message: Some("Successfully logged in.".to_string()),
                }),
            )
                .into_response())
        }
        AuthOutcome::Rejected(RejectReason::Internal) => Err(ApiError::LoginFailed),
        AuthOutcome::Rejected(reason) => Err(ApiError::AuthRejected(reason.message())),
    }
}

// =============================================================================
// Registration validation
// =============================================================================

/// First failing name/email rule, if any.
fn identity_error(first_name: &str, last_name: &str, email: &str) -> Option<&'static str> {
    if first_name.is_empty() {
        return Some("Please enter a first name.");
    }
    if last_name.is_empty() {
        return Some("Please enter a last name.");
    }
    if email.is_empty() {
        return Some("Please enter an email.");
    }
    if !email.contains('@') {
        return Some("Please enter a valid email.");
    }
    if email.contains(char::is_whitespace) {
        return Some("Email cannot contain spaces.");
    }
    if !email.contains('.') {
        return Some("Please enter a valid email.");
    }
    None
}

/// First failing password rule, if any.
fn password_error(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        return Some("Please enter a password.");
    }
    if password.len() < 8 {
        return Some("Password must be at least 8 characters.");
    }
    if password.contains(char::is_whitespace) {
        return Some("Password cannot contain spaces.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one digit.");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter.");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rules_in_order() {
        // Everything wrong at once: first failing rule wins
        assert_eq!(
            identity_error("", "", ""),
            Some("Please enter a first name.")
        );
        assert_eq!(
            identity_error("A", "", ""),
            Some("Please enter a last name.")
        );
        assert_eq!(identity_error("A", "B", ""), Some("Please enter an email."));
        assert_eq!(
            identity_error("A", "B", "not-an-email"),
            Some("Please enter a valid email.")
        );
        assert_eq!(
            identity_error("A", "B", "a b@c.com"),
            Some("Email cannot contain spaces.")
        );
        assert_eq!(
            identity_error("A", "B", "a@b"),
            Some("Please enter a valid email.")
        );
        assert_eq!(identity_error("A", "B", "a@b.com"), None);
    }

    #[test]
    fn test_password_rules_in_order() {
        assert_eq!(password_error(""), Some("Please enter a password."));
        assert_eq!(
            password_error("short1A"),
            Some("Password must be at least 8 characters.")
        );
        assert_eq!(
            password_error("has space1A"),
            Some("Password cannot contain spaces.")
        );
        assert_eq!(
            password_error("NoDigitsHere"),
            Some("Password must contain at least one digit.")
        );
        assert_eq!(
            password_error("nouppercase1"),
            Some("Password must contain at least one uppercase letter.")
        );
        assert_eq!(password_error("Passw0rd"), None);
    }

    #[test]
    fn test_register_body_uses_camel_case() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com",
            "password": "Passw0rd"
        }))
        .expect("deserialize");
        assert_eq!(req.first_name, "A");
        assert_eq!(req.last_name, "B");
    }

    #[test]
    fn test_logout_body_omits_message() {
        let body = serde_json::to_value(StatusResponse {
            success: true,
            message: None,
        })
        .expect("serialize");
        assert_eq!(body, json!({"success": true}));
    }
}

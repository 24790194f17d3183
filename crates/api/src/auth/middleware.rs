//! Request gates and per-request session attachment
//!
//! Authentication state is re-derived on every request from the cookie-carried
//! token: the session store resolves the token to an email, and the credential
//! store resolves the email to a user. No decision is cached across requests.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::sessions::{SESSION_COOKIE, SESSION_TTL};
use crate::auth::strategy::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the request's session, if any, to a live identity.
///
/// Fails open to anonymous: a missing cookie, unknown or expired token, a
/// user deleted since the session was issued, or a backend failure all yield
/// `None`. Backend failures are logged; the others are ordinary.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<AuthUser> {
    let token = session_token(headers)?;

    let record = match state.sessions.resolve(&token).await {
        Ok(record) => record?,
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            return None;
        }
    };

    match state.users.find_by_email(&record.email).await {
        Ok(Some(user)) => Some(AuthUser::from(user)),
        Ok(None) => {
            tracing::warn!(email = %record.email, "session refers to a deleted user");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "user lookup for session failed");
            None
        }
    }
}

/// Gate: the request must carry a valid session.
///
/// Attaches the resolved `AuthUser` as a request extension for handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_session(&state, req.headers()).await {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => ApiError::Unauthenticated.into_response(),
    }
}

/// Gate: the request must NOT carry a valid session.
pub async fn require_anonymous(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match resolve_session(&state, req.headers()).await {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "authenticated user hit an anonymous-only route");
            ApiError::AlreadyAuthenticated.into_response()
        }
        None => next.run(req).await,
    }
}

/// Extract the session token from the Cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// Build the Set-Cookie value attaching a session to the client.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_TTL.whole_seconds()
    )
}

/// Build the Set-Cookie value removing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

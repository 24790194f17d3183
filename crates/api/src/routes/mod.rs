//! API routes

pub mod auth;
pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    auth::{require_anonymous, require_auth},
    state::AppState,
};

/// Create all API routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Anonymous-only routes: an authenticated client must not re-register or
    // re-login over its live session
    let guest_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_anonymous,
        ));

    // Authenticated-only routes
    let protected_routes = Router::new()
        .route("/api/me", get(auth::me))
        .route("/api/tester", get(auth::tester))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(guest_routes)
        .merge(protected_routes)
        .route("/api/logout", get(auth::logout))
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

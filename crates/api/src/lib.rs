//! Chatline API Library
//!
//! This crate contains the session-authentication service for Chatline:
//! registration, login, logout, and the gates protecting every other route.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod users;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

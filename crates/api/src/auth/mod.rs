//! Authentication module for Chatline

pub mod middleware;
pub mod password;
pub mod sessions;
pub mod strategy;

pub use middleware::{require_anonymous, require_auth, resolve_session};
pub use password::{generate_unmatchable_hash, hash_password, verify_password};
pub use sessions::{SessionStore, SESSION_COOKIE};
pub use strategy::{AuthOutcome, AuthUser, Authenticator, RejectReason};

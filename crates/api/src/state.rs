//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::password::PasswordError;
use crate::auth::sessions::SessionStore;
use crate::auth::strategy::Authenticator;
use crate::config::Config;
use crate::users::UserStore;

/// Handles constructed once at startup and passed down to every handler.
///
/// All cross-request state lives behind these store handles; the handlers
/// themselves hold nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub users: UserStore,
    pub sessions: SessionStore,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, sessions: SessionStore) -> Result<Self, PasswordError> {
        Ok(Self {
            config: Arc::new(config),
            users: UserStore::new(pool.clone()),
            pool,
            sessions,
            authenticator: Arc::new(Authenticator::new()?),
        })
    }
}

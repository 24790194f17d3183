//! Server-side session persistence in Redis
//!
//! Sessions map an opaque token to the authenticated identity's email — the
//! minimal durable key. The full user record is re-fetched on every request,
//! so nothing here goes stale when a user changes or disappears.

use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "chatline_session";

/// Fixed session lifetime (6 days), matching the cookie max-age.
pub const SESSION_TTL: Duration = Duration::days(6);

const SESSION_KEY_PREFIX: &str = "session:";

/// Durable session payload stored under `session:<token>`.
///
/// Redis TTL is the authoritative expiry; `expires_at` is carried in the
/// payload and checked defensively on resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session backend error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("malformed session payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Durable token-to-identity mapping backed by Redis.
///
/// `ConnectionManager` multiplexes and reconnects internally; clone the store
/// freely across request handlers.
#[derive(Clone)]
pub struct SessionStore {
    conn: ConnectionManager,
}

impl SessionStore {
    pub async fn connect(redis_url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    /// Create a session for an authenticated identity, returning the token.
    pub async fn create(&self, email: &str) -> Result<String, SessionError> {
        let token = generate_token();
        let now = OffsetDateTime::now_utc();
        let record = SessionRecord {
            email: email.to_string(),
            created_at: now.unix_timestamp(),
            expires_at: (now + SESSION_TTL).unix_timestamp(),
        };
        let payload = serde_json::to_string(&record)?;

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(session_key(&token), payload, SESSION_TTL.whole_seconds() as u64)
            .await?;

        Ok(token)
    }

    /// Resolve a token to its session, if one exists and has not expired.
    pub async fn resolve(&self, token: &str) -> Result<Option<SessionRecord>, SessionError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(session_key(token)).await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let record: SessionRecord = serde_json::from_str(&payload)?;
        if record.expires_at <= OffsetDateTime::now_utc().unix_timestamp() {
            self.destroy(token).await?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Destroy a session. Destroying an unknown token is not an error.
    pub async fn destroy(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(session_key(token)).await?;
        Ok(())
    }
}

fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

/// Generate an opaque session token
///
/// Returns a 32-byte hex-encoded token (64 characters)
fn generate_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    async fn test_sessions() -> SessionStore {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        SessionStore::connect(&url).await.expect("redis required")
    }

    #[tokio::test]
    #[ignore] // Requires redis
    async fn test_create_resolve_destroy() {
        let store = test_sessions().await;

        let token = store.create("ada@example.com").await.expect("create");
        let record = store
            .resolve(&token)
            .await
            .expect("resolve")
            .expect("session missing");
        assert_eq!(record.email, "ada@example.com");
        assert!(record.expires_at > record.created_at);

        store.destroy(&token).await.expect("destroy");
        assert!(store.resolve(&token).await.expect("resolve").is_none());
    }

    #[tokio::test]
    #[ignore] // Requires redis
    async fn test_unknown_token_resolves_to_none() {
        let store = test_sessions().await;
        assert!(store
            .resolve("0000000000000000000000000000000000000000000000000000000000000000")
            .await
            .expect("resolve")
            .is_none());
    }
}

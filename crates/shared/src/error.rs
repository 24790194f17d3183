//! Error types for Chatline storage

use thiserror::Error;

/// Failures surfaced by the credential store.
///
/// `Conflict` (duplicate email) is kept distinct from `Unavailable` so callers
/// can give different user-facing messages.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique violation
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Conflict;
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

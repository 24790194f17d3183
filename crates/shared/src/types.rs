//! Shared types for Chatline

use sqlx::FromRow;
use uuid::Uuid;

/// A registered user as stored in the `user_data` table.
///
/// Deliberately does not implement `Serialize`: the password hash must never
/// reach a client-facing response. Response types copy the public fields.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

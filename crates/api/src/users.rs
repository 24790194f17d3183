//! Credential store over the `user_data` table

use sqlx::PgPool;

use chatline_shared::{StoreError, User};

/// Persistent store of registered identities and their password hashes.
///
/// The handle is a thin wrapper over the connection pool; clone it freely.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by email. Emails compare exactly as stored.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password AS password_hash
            FROM user_data
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a new user record.
    ///
    /// The UNIQUE constraint on email is the authoritative duplicate check: a
    /// concurrent insert of the same email surfaces as `StoreError::Conflict`
    /// here regardless of any earlier advisory lookup.
    pub async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_data (id, first_name, last_name, email, password, channels)
            VALUES ($1, $2, $3, $4, $5, '{}')
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id = %user.id, "user record created");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn test_store() -> UserStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = chatline_shared::db::create_pool(&url, 5)
            .await
            .expect("Failed to connect");
        chatline_shared::db::run_migrations(&pool)
            .await
            .expect("Failed to migrate");
        UserStore::new(pool)
    }

    fn sample_user(email: String) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email,
            password_hash: "$argon2id$not-a-real-hash".to_string(),
        }
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_insert_and_find() {
        let store = test_store().await;
        let email = format!("{}@example.com", Uuid::new_v4());
        let user = sample_user(email.clone());

        store.insert(&user).await.expect("insert failed");

        let found = store
            .find_by_email(&email)
            .await
            .expect("lookup failed")
            .expect("user missing");
        assert_eq!(found.id, user.id);
        assert_eq!(found.password_hash, user.password_hash);

        assert!(store
            .find_by_email("nobody@example.com")
            .await
            .expect("lookup failed")
            .is_none());
    }

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_duplicate_email_is_conflict() {
        let store = test_store().await;
        let email = format!("{}@example.com", Uuid::new_v4());

        store
            .insert(&sample_user(email.clone()))
            .await
            .expect("first insert failed");

        let second = store.insert(&sample_user(email)).await;
        assert!(matches!(second, Err(StoreError::Conflict)));
    }
}

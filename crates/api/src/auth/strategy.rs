//! Credential verification strategy
//!
//! Validates an (email, password) pair against the credential store and
//! produces either an authenticated identity or a rejection reason. The
//! outcome is transient; nothing here is persisted.

use serde::Serialize;
use uuid::Uuid;

use chatline_shared::User;

use crate::auth::password::{generate_unmatchable_hash, verify_password, PasswordError};
use crate::users::UserStore;

/// An authenticated identity with the password hash stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// Result of a credential check.
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(AuthUser),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownEmail,
    WrongPassword,
    /// Storage or hashing failure. Detail is logged server-side; clients only
    /// ever see the generic message.
    Internal,
}

impl RejectReason {
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::UnknownEmail => "No user with that email",
            RejectReason::WrongPassword => "Password incorrect",
            RejectReason::Internal => "Error logging in.",
        }
    }
}

/// Checks credentials against the store.
///
/// Holds a precomputed unmatchable digest so the unknown-email path costs a
/// full Argon2 verification, keeping its wall-clock time in the same order of
/// magnitude as the found-but-mismatched path.
pub struct Authenticator {
    fallback_hash: String,
}

impl Authenticator {
    pub fn new() -> Result<Self, PasswordError> {
        Ok(Self {
            fallback_hash: generate_unmatchable_hash()?,
        })
    }

    /// Run the credential check for one login attempt.
    pub async fn authenticate(&self, users: &UserStore, email: &str, password: &str) -> AuthOutcome {
        let user = match users.find_by_email(email).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "credential lookup failed");
                return AuthOutcome::Rejected(RejectReason::Internal);
            }
        };

        self.evaluate(user, password)
    }

    /// Decide the outcome for a lookup result.
    fn evaluate(&self, user: Option<User>, password: &str) -> AuthOutcome {
        let Some(user) = user else {
            // Burn a verification against the fallback digest before rejecting.
            let _ = verify_password(password, &self.fallback_hash);
            return AuthOutcome::Rejected(RejectReason::UnknownEmail);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => {
                tracing::info!(user_id = %user.id, "credentials verified");
                AuthOutcome::Authenticated(AuthUser::from(user))
            }
            Ok(false) => {
                tracing::warn!(user_id = %user.id, "password mismatch");
                AuthOutcome::Rejected(RejectReason::WrongPassword)
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "password verification failed");
                AuthOutcome::Rejected(RejectReason::Internal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    fn stored_user(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: hash_password(password).expect("hash failed"),
        }
    }

    #[test]
    fn test_correct_password_authenticates_and_strips_hash() {
        let auth = Authenticator::new().expect("authenticator");
        let user = stored_user("Passw0rdExample");
        let id = user.id;

        match auth.evaluate(Some(user), "Passw0rdExample") {
            AuthOutcome::Authenticated(identity) => {
                assert_eq!(identity.id, id);
                assert_eq!(identity.email, "ada@example.com");
                // AuthUser has no hash field; serialization must not leak one
                let json = serde_json::to_value(&identity).expect("serialize");
                assert!(json.get("password").is_none());
                assert!(json.get("passwordHash").is_none());
            }
            other => panic!("expected Authenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let auth = Authenticator::new().expect("authenticator");
        let user = stored_user("Passw0rdExample");

        match auth.evaluate(Some(user), "Wr0ngPassword") {
            AuthOutcome::Rejected(reason) => {
                assert_eq!(reason, RejectReason::WrongPassword);
                assert_eq!(reason.message(), "Password incorrect");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_email_is_rejected() {
        let auth = Authenticator::new().expect("authenticator");

        match auth.evaluate(None, "Passw0rdExample") {
            AuthOutcome::Rejected(reason) => {
                assert_eq!(reason, RejectReason::UnknownEmail);
                assert_eq!(reason.message(), "No user with that email");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_stored_hash_is_internal() {
        let auth = Authenticator::new().expect("authenticator");
        let mut user = stored_user("Passw0rdExample");
        user.password_hash = "corrupt".to_string();

        match auth.evaluate(Some(user), "Passw0rdExample") {
            AuthOutcome::Rejected(RejectReason::Internal) => {}
            other => panic!("expected internal rejection, got {:?}", other),
        }
    }
}

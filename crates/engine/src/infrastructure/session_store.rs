//! In-memory auth session store and password hashing.
//!
//! Login issues an opaque token kept in a concurrent map; the HTTP
//! layer's cookie extractor resolves tokens back to user ids. Tokens do
//! not survive a restart - clients simply log in again.

use dashmap::DashMap;
use uuid::Uuid;

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::infrastructure::ports::AuthError;
use fableforge_domain::UserId;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "fableforge_session";

#[derive(Default)]
pub struct SessionStore {
    tokens: DashMap<String, UserId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for a user.
    pub fn issue(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    /// Resolve a token to its user, if the session is live.
    pub fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).map(|entry| *entry.value())
    }

    /// Drop a session; unknown tokens are a no-op.
    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
pub fn verify_password(stored: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_resolve_revoke() {
        let store = SessionStore::new();
        let user_id = UserId::new();

        let token = store.issue(user_id);
        assert_eq!(store.resolve(&token), Some(user_id));

        store.revoke(&token);
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert_eq!(store.resolve("not-a-token"), None);
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("correct horse battery staple").expect("hashes");
        assert!(verify_password(&hash, "correct horse battery staple").expect("verifies"));
        assert!(!verify_password(&hash, "wrong password").expect("verifies"));
    }
}

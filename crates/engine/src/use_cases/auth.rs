//! Account registration, login, and session management.

use std::sync::Arc;

use serde::Deserialize;

use crate::infrastructure::ports::{AuthError, ClockPort, UserRepo};
use crate::infrastructure::session_store::{hash_password, verify_password, SessionStore};
use fableforge_domain::{User, UserId};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A logged-in user plus their freshly issued session token.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

pub struct AuthService {
    users: Arc<dyn UserRepo>,
    sessions: Arc<SessionStore>,
    clock: Arc<dyn ClockPort>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        sessions: Arc<SessionStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            users,
            sessions,
            clock,
        }
    }

    /// Register a new account and log it in. Duplicate username or
    /// email is a conflict.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthenticatedUser, AuthError> {
        if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty()
        {
            return Err(AuthError::Validation(
                "username, email, and password are required".to_string(),
            ));
        }

        if self
            .users
            .find_by_username_or_email(&req.username, &req.email)
            .await?
            .is_some()
        {
            return Err(AuthError::Conflict);
        }

        let hash = hash_password(&req.password)?;
        let mut user = User::new(req.username, req.email, hash, self.clock.now());
        user.record_login(self.clock.now());
        self.users.save(&user).await?;

        let token = self.sessions.issue(user.id);
        tracing::info!(user_id = %user.id, "registered new user");
        Ok(AuthenticatedUser { user, token })
    }

    /// Verify credentials, stamp the login time, and issue a session.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthenticatedUser, AuthError> {
        if req.username.trim().is_empty() || req.password.is_empty() {
            return Err(AuthError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let mut user = self
            .users
            .find_by_username(&req.username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, &req.password)? {
            return Err(AuthError::InvalidCredentials);
        }

        user.record_login(self.clock.now());
        self.users.save(&user).await?;

        let token = self.sessions.issue(user.id);
        Ok(AuthenticatedUser { user, token })
    }

    /// Drop a session token; unknown tokens are a no-op.
    pub fn logout(&self, token: &str) {
        self.sessions.revoke(token);
    }

    /// The currently logged-in user's account.
    pub async fn current_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::MockUserRepo;

    fn service(users: MockUserRepo) -> AuthService {
        AuthService::new(
            Arc::new(users),
            Arc::new(SessionStore::new()),
            Arc::new(SystemClock::new()),
        )
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "martha".to_string(),
            email: "martha@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let service = service(MockUserRepo::new());
        let err = service
            .register(RegisterRequest {
                username: String::new(),
                email: "a@b.c".to_string(),
                password: "pw".to_string(),
            })
            .await
            .expect_err("should fail");
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_duplicates() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_username_or_email()
            .returning(|username, _| {
                let username = username.to_string();
                Ok(Some(User::new(
                    username,
                    "taken@example.com",
                    "$argon2id$fake",
                    chrono::Utc::now(),
                )))
            });
        let service = service(users);

        let err = service
            .register(register_request())
            .await
            .expect_err("should conflict");
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn register_issues_session() {
        let mut users = MockUserRepo::new();
        users
            .expect_find_by_username_or_email()
            .returning(|_, _| Ok(None));
        users.expect_save().returning(|_| Ok(()));
        let service = service(users);

        let authed = service.register(register_request()).await.expect("registers");
        assert!(!authed.token.is_empty());
        assert_eq!(authed.user.username, "martha");
        // The hash must verify against the original password.
        assert!(verify_password(&authed.user.password_hash, "hunter22").expect("verifies"));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let hash = hash_password("right-password").expect("hashes");
        let mut users = MockUserRepo::new();
        users.expect_find_by_username().returning(move |name| {
            Ok(Some(User::new(
                name,
                "m@example.com",
                hash.clone(),
                chrono::Utc::now(),
            )))
        });
        let service = service(users);

        let err = service
            .login(LoginRequest {
                username: "martha".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .expect_err("should fail");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_stamps_last_login() {
        let hash = hash_password("pw123456").expect("hashes");
        let mut users = MockUserRepo::new();
        users.expect_find_by_username().returning(move |name| {
            Ok(Some(User::new(
                name,
                "m@example.com",
                hash.clone(),
                chrono::Utc::now(),
            )))
        });
        users
            .expect_save()
            .withf(|user: &User| user.last_login.is_some())
            .returning(|_| Ok(()));
        let service = service(users);

        let authed = service
            .login(LoginRequest {
                username: "martha".to_string(),
                password: "pw123456".to_string(),
            })
            .await
            .expect("logs in");
        assert!(authed.user.last_login.is_some());
    }

    #[tokio::test]
    async fn unknown_user_is_invalid_credentials() {
        let mut users = MockUserRepo::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        let service = service(users);

        let err = service
            .login(LoginRequest {
                username: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .expect_err("should fail");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}

//! Registration, login and token resolution.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::{NewUser, User};
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// A freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Account use cases.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Register a regular (non-superuser) account.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();

        if self
            .users
            .email_exists(&email)
            .await
            .map_err(DomainError::database("select"))?
        {
            return Err(DomainError::Duplicate {
                field: "email",
                value: email,
            });
        }

        let password_hash = self.hash(password)?;
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                is_superuser: false,
            })
            .await
            .map_err(DomainError::database("create"))?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, DomainError> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(DomainError::database("select"))?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = user.id, "Rejected login with wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        if self.passwords.needs_rehash(&user.password_hash) {
            self.rehash(&user, password).await;
        }

        let access_token = self
            .tokens
            .generate_token(&user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer",
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Resolve the user a bearer token was issued to.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.validate_token(token)?;

        self.users
            .find_by_email(&claims.subject)
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?
            .ok_or(AuthError::UnknownSubject)
    }

    /// Make sure a superuser account exists for `email`, creating it with
    /// `password` or promoting the existing account.
    pub async fn ensure_superuser(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();

        match self.users.find_by_email(&email).await? {
            Some(user) if user.is_superuser => Ok(user),
            Some(user) => {
                let user = self
                    .users
                    .set_superuser(user.id, true)
                    .await
                    .map_err(DomainError::database("update"))?;
                tracing::info!(user_id = user.id, "Existing user promoted to superuser");
                Ok(user)
            }
            None => {
                if password.len() < 8 {
                    return Err(DomainError::validation(
                        "Superuser password must be at least 8 characters",
                        json!({ "email": email }),
                    ));
                }
                let password_hash = self.hash(password)?;
                let user = self
                    .users
                    .create(NewUser {
                        email,
                        password_hash,
                        is_superuser: true,
                    })
                    .await
                    .map_err(DomainError::database("create"))?;
                tracing::info!(user_id = user.id, "Superuser created");
                Ok(user)
            }
        }
    }

    fn hash(&self, password: &str) -> Result<String, DomainError> {
        self.passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))
    }

    async fn rehash(&self, user: &User, password: &str) {
        let result = match self.passwords.hash(password) {
            Ok(hash) => self
                .users
                .update_password_hash(user.id, &hash)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => tracing::info!(user_id = user.id, "Password hash upgraded"),
            Err(e) => tracing::warn!(user_id = user.id, error = %e, "Password rehash failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{FakePasswords, FakeTokens, InMemoryStore};

    fn service(store: &Arc<InMemoryStore>) -> AuthService {
        AuthService::new(
            store.clone(),
            Arc::new(FakeTokens),
            Arc::new(FakePasswords::default()),
        )
    }

    #[tokio::test]
    async fn register_lowercases_email_and_hashes_password() {
        let store = Arc::new(InMemoryStore::default());
        let user = service(&store)
            .register("Writer@Example.com", "password123")
            .await
            .unwrap();

        assert_eq!(user.email, "writer@example.com");
        assert_ne!(user.password_hash, "password123");
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let store = Arc::new(InMemoryStore::default());
        let auth = service(&store);
        auth.register("writer@example.com", "password123").await.unwrap();

        let err = auth
            .register("WRITER@example.com", "password456")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Duplicate { field: "email", .. }));
    }

    #[tokio::test]
    async fn login_issues_token_for_valid_credentials() {
        let store = Arc::new(InMemoryStore::default());
        let auth = service(&store);
        auth.register("writer@example.com", "password123").await.unwrap();

        let token = auth.login("writer@example.com", "password123").await.unwrap();

        assert_eq!(token.token_type, "bearer");
        let user = auth.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.email, "writer@example.com");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let store = Arc::new(InMemoryStore::default());
        let auth = service(&store);
        auth.register("writer@example.com", "password123").await.unwrap();

        let wrong = auth.login("writer@example.com", "nope-nope").await.unwrap_err();
        let unknown = auth.login("ghost@example.com", "password123").await.unwrap_err();

        assert!(matches!(wrong, DomainError::InvalidCredentials));
        assert!(matches!(unknown, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_upgrades_outdated_hash() {
        let store = Arc::new(InMemoryStore::default());
        let passwords = Arc::new(FakePasswords::with_outdated_prefix("old$"));
        let auth = AuthService::new(store.clone(), Arc::new(FakeTokens), passwords);
        let user = auth.register("writer@example.com", "password123").await.unwrap();
        store.force_password_hash(user.id, "old$password123");

        auth.login("writer@example.com", "password123").await.unwrap();

        let stored = store.user(user.id).unwrap();
        assert_eq!(stored.password_hash, "hashed$password123");
    }

    #[tokio::test]
    async fn authenticate_rejects_token_for_unknown_user() {
        let store = Arc::new(InMemoryStore::default());
        let err = service(&store)
            .authenticate("token-for:ghost@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UnknownSubject));
    }

    #[tokio::test]
    async fn ensure_superuser_creates_then_promotes() {
        let store = Arc::new(InMemoryStore::default());
        let auth = service(&store);

        let admin = auth.ensure_superuser("admin@example.com", "password123").await.unwrap();
        assert!(admin.is_superuser);

        let writer = auth.register("writer@example.com", "password123").await.unwrap();
        let promoted = auth.ensure_superuser("writer@example.com", "ignored").await.unwrap();
        assert_eq!(promoted.id, writer.id);
        assert!(promoted.is_superuser);
    }
}

//! Authentication ports.

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Email of the user the token was issued to.
    pub subject: String,
    pub issued_at: i64,
    pub exp: i64,
}

/// Token service trait for signed bearer tokens.
pub trait TokenService: Send + Sync {
    /// Issue an access token for `subject`.
    fn generate_token(&self, subject: &str) -> Result<String, AuthError>;

    /// Verify signature, expiry and issuer, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Whether `hash` was produced with different parameters than the ones
    /// this service uses now.
    fn needs_rehash(&self, hash: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token subject does not match any user")]
    UnknownSubject,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

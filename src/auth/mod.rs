use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{issue_token, validate_token};

/// JWT claims embedded in every bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's identity (user id for real accounts).
    pub sub: String,
    /// Unique token ID.
    pub jti: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Errors from the credential and token layer.
///
/// Token failures deliberately carry their reason only for logging; the
/// API boundary collapses them all into one generic unauthorized outcome.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("JWT secret not configured")]
    MissingSecret,
}

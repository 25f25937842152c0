//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while checking the secret key.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The supplied key does not match the configured hash.
    #[error("invalid key")]
    InvalidKey,

    /// The configured hash is not a valid PHC string.
    #[error("malformed key hash: {0}")]
    MalformedHash(String),

    /// Hashing a new key failed.
    #[error("password hashing error")]
    PasswordHash,
}

//! Secret key authentication.
//!
//! Deletes are authorized by a single shared key. Only its Argon2 hash is
//! configured (`CAFE_SECRET_KEY`); submitted keys are checked with
//! `PasswordVerifier`, never compared as plain strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

/// Hash a key using Argon2id, for storing in `CAFE_SECRET_KEY`.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_secret_key(key: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a submitted key against the configured hash.
///
/// The Argon2 parameters are taken from the hash itself.
///
/// # Errors
///
/// Returns `AuthError::InvalidKey` if the key does not match.
/// Returns `AuthError::MalformedHash` if the configured hash cannot be parsed.
pub fn verify_secret_key(key: &str, hash: &SecretString) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash.expose_secret())
        .map_err(|e| AuthError::MalformedHash(e.to_string()))?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(key.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidKey)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = SecretString::from(hash_secret_key("correct horse").unwrap());

        assert!(verify_secret_key("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_secret_key("battery staple", &hash),
            Err(AuthError::InvalidKey)
        ));
        assert!(matches!(
            verify_secret_key("", &hash),
            Err(AuthError::InvalidKey)
        ));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_secret_key("same key").unwrap();
        let second = hash_secret_key("same key").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_rejects_plain_text_hash() {
        let hash = SecretString::from("correct horse");
        assert!(matches!(
            verify_secret_key("correct horse", &hash),
            Err(AuthError::MalformedHash(_))
        ));
    }
}

//! Delete key hashing.
//!
//! The printed PHC string goes into `CAFE_SECRET_KEY`; the key itself is
//! never stored.

use cafe_map_web::services::auth::{AuthError, hash_secret_key};

/// Print the Argon2 hash of `key`.
///
/// # Errors
///
/// Returns an error if the key is empty or hashing fails.
pub fn run(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    if key.is_empty() {
        return Err("key must not be empty".into());
    }

    let hash = hash_secret_key(key).map_err(|e: AuthError| e.to_string())?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    Ok(())
}

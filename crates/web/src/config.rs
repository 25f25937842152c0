//! Cafe Map configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GOOGLE_MAPS_KEY` - Google Maps / Places API key
//! - `CAFE_SECRET_KEY` - Argon2 hash of the delete key (`cafe-cli hash-key`)
//!
//! ## Optional
//! - `CAFE_DATABASE_URL` - `SQLite` URL (falls back to `DATABASE_URL`, default: `sqlite://cafes.db`)
//! - `CAFE_HOST` - Bind address (default: 127.0.0.1)
//! - `CAFE_PORT` - Listen port (default: 3000)
//! - `CAFE_BASE_URL` - Public URL of the site (default: `http://localhost:3000`)
//! - `CAFE_STATIC_DIR` - Static asset directory (default: `crates/web/static`)
//! - `GOOGLE_MAPS_API_BASE` - Places API origin (default: `https://maps.googleapis.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use argon2::password_hash::PasswordHash;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_DATABASE_URL: &str = "sqlite://cafes.db";
const DEFAULT_STATIC_DIR: &str = "crates/web/static";
const DEFAULT_API_BASE: &str = "https://maps.googleapis.com";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Cafe Map application configuration.
#[derive(Debug, Clone)]
pub struct CafeConfig {
    /// `SQLite` connection URL
    pub database_url: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Google Maps configuration
    pub google: GoogleMapsConfig,
    /// Argon2 PHC hash of the key that authorizes deletes
    pub secret_key_hash: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// Google Maps / Places configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GoogleMapsConfig {
    /// API key for Places and the Maps JavaScript widget
    pub api_key: SecretString,
    /// Origin of the Places web service
    pub api_base: String,
}

impl std::fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CafeConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check,
    /// password hash format).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("CAFE_DATABASE_URL");
        let host = get_env_or_default("CAFE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("CAFE_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CAFE_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("CAFE_BASE_URL", "http://localhost:3000");
        let static_dir = PathBuf::from(get_env_or_default("CAFE_STATIC_DIR", DEFAULT_STATIC_DIR));

        let google = GoogleMapsConfig::from_env()?;
        let secret_key_hash = get_password_hash("CAFE_SECRET_KEY")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            static_dir,
            google,
            secret_key_hash,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl GoogleMapsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: get_validated_secret("GOOGLE_MAPS_KEY")?,
            api_base: get_env_or_default("GOOGLE_MAPS_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Database URL alone, for tools that need no other settings.
///
/// Loads `.env` like [`CafeConfig::from_env`].
#[must_use]
pub fn database_url_from_env() -> String {
    let _ = dotenvy::dotenv();
    get_database_url("CAFE_DATABASE_URL")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> String {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by Google Cloud."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Validate that a value is a PHC-format password hash.
fn validate_password_hash(value: &str, var_name: &str) -> Result<(), ConfigError> {
    PasswordHash::new(value).map(|_| ()).map_err(|e| {
        ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be a password hash generated by `cafe-cli hash-key` ({e})"),
        )
    })
}

/// Load a password hash from environment.
fn get_password_hash(key: &str) -> Result<SecretString, ConfigError> {
    let value = SecretString::from(get_required_env(key)?);
    validate_password_hash(value.expose_secret(), key)?;
    Ok(value)
}

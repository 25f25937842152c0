//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Secret key hashing and verification for destructive operations

pub mod auth;

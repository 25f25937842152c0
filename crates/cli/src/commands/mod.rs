//! CLI command implementations.

pub mod hash_key;
pub mod migrate;
pub mod seed;

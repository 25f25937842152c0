//! Cafe Map Core - Shared domain types.
//!
//! This crate provides the types used across all Cafe Map components:
//! - `web` - The HTML site and JSON API
//! - `cli` - Command-line tools for migrations, key hashing and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Query construction lives here as a typed
//! [`Predicate`](predicate::Predicate) so it can be tested without a store.
//!
//! # Modules
//!
//! - [`types`] - Cafe records, IDs, amenities and validated coordinates
//! - [`predicate`] - Search condition builder
//! - [`geo`] - Viewports and map centering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod geo;
pub mod predicate;
pub mod types;

pub use geo::{LatLng, Viewport};
pub use predicate::{AmenityFilter, Predicate};
pub use types::*;

//! Core types for Cafe Map.
//!
//! This module provides type-safe wrappers for the cafe domain.

pub mod cafe;
pub mod coordinates;
pub mod id;

pub use cafe::{Amenities, Amenity, Cafe, NewCafe};
pub use coordinates::{CoordinateError, Coordinates};
pub use id::*;

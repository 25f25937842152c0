//! Validated latitude/longitude pairs.


use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing [`Coordinates`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    /// The input is not a decimal number.
    #[error("{field} must be a number (got {input:?})")]
    NotANumber {
        /// Which coordinate failed.
        field: &'static str,
        /// The rejected input.
        input: String,
    },
    /// Latitude outside [-90, 90].
    #[error("latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),
    /// Longitude outside [-180, 180].
    #[error("longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),
}

/// A point on the Earth.
///
/// ## Constraints
///
/// - Latitude in [-90, 90]
/// - Longitude in [-180, 180]
/// - Neither component is NaN or infinite
///
/// ## Examples
///
/// ```
/// use cafe_map_core::Coordinates;
///
/// assert!(Coordinates::parse("45.0", "9.0").is_ok());
/// assert!(Coordinates::parse("abc", "9.0").is_err());
/// assert!(Coordinates::parse("999", "9.0").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Minimum and maximum latitude.
    pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
    /// Minimum and maximum longitude.
    pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

    /// Validate a latitude/longitude pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is outside its range or not finite.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(Self::LAT_RANGE.0..=Self::LAT_RANGE.1).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(Self::LON_RANGE.0..=Self::LON_RANGE.1).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Parse coordinates from user input.
    ///
    /// # Errors
    ///
    /// Returns `CoordinateError::NotANumber` if either string is not a number,
    /// or a range error if it is outside the valid range.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, CoordinateError> {
        Self::new(parse_component("latitude", lat)?, parse_component("longitude", lon)?)
    }

    /// Clamp arbitrary stored values into the valid range.
    ///
    /// Used for display only; the stored record keeps its original values.
    /// NaN components are mapped to 0.
    #[must_use]
    pub fn clamped(lat: f64, lon: f64) -> Self {
        Self {
            lat: clamp_component(lat, Self::LAT_RANGE),
            lon: clamp_component(lon, Self::LON_RANGE),
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.lon
    }
}

fn parse_component(field: &'static str, input: &str) -> Result<f64, CoordinateError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| CoordinateError::NotANumber {
            field,
            input: input.to_owned(),
        })
}

fn clamp_component(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(min, max)
}

//! Cafe records and their amenities.

use serde::{Deserialize, Serialize};

use super::CafeId;

/// A persisted cafe record.
///
/// Serializes to the public JSON shape, where longitude is exposed as `lng`.
/// Coordinates are stored exactly as submitted; use
/// [`Coordinates::clamped`](super::Coordinates::clamped) when displaying them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::FromRow))]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub has_sockets: bool,
    pub can_take_calls: bool,
    pub coffee_price: Option<String>,
    pub lat: f64,
    #[serde(rename = "lng")]
    pub lon: f64,
}

impl Cafe {
    /// The amenity flags of this cafe.
    #[must_use]
    pub const fn amenities(&self) -> Amenities {
        Amenities {
            has_toilet: self.has_toilet,
            has_wifi: self.has_wifi,
            has_sockets: self.has_sockets,
            can_take_calls: self.can_take_calls,
        }
    }
}

/// A cafe that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    #[serde(flatten)]
    pub amenities: Amenities,
    #[serde(default)]
    pub coffee_price: Option<String>,
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

/// One of the boolean amenity columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Amenity {
    Toilet,
    Wifi,
    Sockets,
    Calls,
}

impl Amenity {
    /// Every amenity, in column order.
    pub const ALL: [Self; 4] = [Self::Toilet, Self::Wifi, Self::Sockets, Self::Calls];

    /// The column that stores this amenity.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Toilet => "has_toilet",
            Self::Wifi => "has_wifi",
            Self::Sockets => "has_sockets",
            Self::Calls => "can_take_calls",
        }
    }
}

/// Boolean amenity flags of a cafe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    #[serde(default)]
    pub has_toilet: bool,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_sockets: bool,
    #[serde(default)]
    pub can_take_calls: bool,
}

impl Amenities {
    /// Whether the given amenity is available.
    #[must_use]
    pub const fn has(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Toilet => self.has_toilet,
            Amenity::Wifi => self.has_wifi,
            Amenity::Sockets => self.has_sockets,
            Amenity::Calls => self.can_take_calls,
        }
    }
}

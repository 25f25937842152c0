//! Wire types of the Places text search and the candidates built from them.

use serde::Deserialize;

use cafe_map_core::{LatLng, Viewport};

/// Body of a `textsearch/json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One place as returned by the provider.
///
/// Every field is optional on the wire; callers decide which ones they need.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceResult {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl PlaceResult {
    /// The place's position, if reported.
    #[must_use]
    pub fn location(&self) -> Option<LatLng> {
        self.geometry.as_ref()?.location
    }

    /// The place's viewport, if both corners are reported.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        let viewport = self.geometry.as_ref()?.viewport.as_ref()?;
        Some(Viewport::from_corners(viewport.northeast?, viewport.southwest?))
    }

    /// Reference of the first photo, if any.
    #[must_use]
    pub fn photo_reference(&self) -> Option<&str> {
        self.photos.first().map(|photo| photo.photo_reference.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
    pub viewport: Option<WireViewport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireViewport {
    pub northeast: Option<LatLng>,
    pub southwest: Option<LatLng>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
}

/// A place offered to the user when adding a cafe.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub place_id: String,
    pub location: LatLng,
    pub address: String,
    pub image_url: String,
}

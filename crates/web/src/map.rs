//! Map marker construction.
//!
//! A [`MapView`] is serialized into the page's `data-map` attribute and drawn
//! by `static/js/map.js` with the Google Maps JavaScript API.

use askama::Template;
use serde::Serialize;
use url::form_urlencoded;

use cafe_map_core::geo::extent_center;
use cafe_map_core::{Amenity, Cafe, Coordinates, LatLng};

use crate::geocode::Candidate;

/// Icon of every marker.
pub const MARKER_ICON: &str = "https://maps.google.com/mapfiles/ms/icons/red-dot.png";

const WORLD_CENTER: LatLng = LatLng::new(50.0, 10.0);
const WORLD_ZOOM: u8 = 3;
const LOCATE_FALLBACK_CENTER: LatLng = LatLng::new(51.0, 0.0);
const LOCATE_ZOOM: u8 = 13;

/// Popup icon order.
const ICON_ORDER: [Amenity; 4] = [
    Amenity::Toilet,
    Amenity::Wifi,
    Amenity::Calls,
    Amenity::Sockets,
];

/// A map ready to be drawn in the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub identifier: &'static str,
    pub center: LatLng,
    pub zoom: Option<u8>,
    pub fit_bounds: bool,
    pub markers: Vec<Marker>,
}

/// One marker with its info popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub icon: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub infobox: String,
}

/// An amenity icon shown in cafe popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenityIcon {
    pub src: &'static str,
    pub alt: &'static str,
}

impl AmenityIcon {
    const fn for_amenity(amenity: Amenity) -> Self {
        match amenity {
            Amenity::Toilet => Self {
                src: "/static/img/wc.svg",
                alt: "Toilets",
            },
            Amenity::Wifi => Self {
                src: "/static/img/wifi.svg",
                alt: "Wifi",
            },
            Amenity::Calls => Self {
                src: "/static/img/phone.svg",
                alt: "Calls welcome",
            },
            Amenity::Sockets => Self {
                src: "/static/img/pwr.svg",
                alt: "Power sockets",
            },
        }
    }
}

/// Icons for the amenities a cafe has, in display order.
#[must_use]
pub fn amenity_icons(cafe: &Cafe) -> Vec<AmenityIcon> {
    let amenities = cafe.amenities();
    ICON_ORDER
        .into_iter()
        .filter(|amenity| amenities.has(*amenity))
        .map(AmenityIcon::for_amenity)
        .collect()
}

#[derive(Template)]
#[template(path = "map/cafe_popup.html")]
struct CafePopup<'a> {
    cafe: &'a Cafe,
    icons: Vec<AmenityIcon>,
}

#[derive(Template)]
#[template(path = "map/candidate_popup.html")]
struct CandidatePopup<'a> {
    candidate: &'a Candidate,
    add_url: String,
}

impl MapView {
    /// World view without markers.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            identifier: "empty_map",
            center: WORLD_CENTER,
            zoom: Some(WORLD_ZOOM),
            fit_bounds: false,
            markers: Vec::new(),
        }
    }

    /// One marker per cafe, centered on their extent.
    ///
    /// Stored coordinates outside the valid range are clamped for display.
    ///
    /// # Errors
    ///
    /// Returns an error if a popup template fails to render.
    pub fn for_cafes(cafes: &[Cafe]) -> askama::Result<Self> {
        let markers = cafes
            .iter()
            .map(|cafe| {
                let position = Coordinates::clamped(cafe.lat, cafe.lon);
                let popup = CafePopup {
                    cafe,
                    icons: amenity_icons(cafe),
                };
                Ok(Marker {
                    icon: MARKER_ICON,
                    lat: position.lat(),
                    lng: position.lon(),
                    infobox: popup.render()?,
                })
            })
            .collect::<askama::Result<Vec<_>>>()?;

        let Some(center) = extent_center(&positions(&markers)) else {
            return Ok(Self::empty());
        };

        Ok(Self {
            identifier: "all_cafes_map",
            center,
            zoom: None,
            fit_bounds: true,
            markers,
        })
    }

    /// One marker per geocode candidate, centered on the first.
    ///
    /// # Errors
    ///
    /// Returns an error if a popup template fails to render.
    pub fn for_candidates(candidates: &[Candidate]) -> askama::Result<Self> {
        let markers = candidates
            .iter()
            .map(|candidate| {
                let popup = CandidatePopup {
                    candidate,
                    add_url: add_url(candidate),
                };
                Ok(Marker {
                    icon: MARKER_ICON,
                    lat: candidate.location.lat,
                    lng: candidate.location.lng,
                    infobox: popup.render()?,
                })
            })
            .collect::<askama::Result<Vec<_>>>()?;

        let center = markers
            .first()
            .map_or(LOCATE_FALLBACK_CENTER, |marker| {
                LatLng::new(marker.lat, marker.lng)
            });

        Ok(Self {
            identifier: "located_points_map",
            center,
            zoom: Some(LOCATE_ZOOM),
            fit_bounds: false,
            markers,
        })
    }

    /// JSON for the `data-map` attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn positions(markers: &[Marker]) -> Vec<LatLng> {
    markers
        .iter()
        .map(|marker| LatLng::new(marker.lat, marker.lng))
        .collect()
}

/// Link that opens the add form pre-filled with a candidate.
#[must_use]
pub fn add_url(candidate: &Candidate) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("lat", &candidate.location.lat.to_string())
        .append_pair("place_id", &candidate.place_id)
        .append_pair("lng", &candidate.location.lng.to_string())
        .append_pair("photo_url", &candidate.image_url)
        .append_pair("name", &candidate.name)
        .append_pair("address", &candidate.address)
        .finish();
    format!("/add?{query}")
}

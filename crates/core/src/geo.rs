//! Map geometry: viewports and centering.

use serde::{Deserialize, Serialize};

/// A map position as the map widget expects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A bounding box returned by the geocoder for a place name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Viewport {
    /// Build a viewport from its northeast and southwest corners.
    #[must_use]
    pub const fn from_corners(northeast: LatLng, southwest: LatLng) -> Self {
        Self {
            min_lat: southwest.lat,
            max_lat: northeast.lat,
            min_lon: southwest.lng,
            max_lon: northeast.lng,
        }
    }
}

/// Center of the extent covered by `points`.
///
/// This is the midpoint between the minimum and maximum of each axis, not the
/// mean of the points, so a cluster plus one outlier centers halfway to the
/// outlier. Returns `None` for an empty slice.
#[must_use]
pub fn extent_center(points: &[LatLng]) -> Option<LatLng> {
    let (first, rest) = points.split_first()?;

    let (mut min_lat, mut max_lat) = (first.lat, first.lat);
    let (mut min_lng, mut max_lng) = (first.lng, first.lng);
    for point in rest {
        min_lat = min_lat.min(point.lat);
        max_lat = max_lat.max(point.lat);
        min_lng = min_lng.min(point.lng);
        max_lng = max_lng.max(point.lng);
    }

    Some(LatLng::new(
        f64::midpoint(min_lat, max_lat),
        f64::midpoint(min_lng, max_lng),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extent_center_is_midpoint_not_mean() {
        let points = [
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(10.0, 4.0),
        ];
        let center = extent_center(&points).unwrap();

        // midpoint of extents: (0 + 10) / 2, (0 + 4) / 2
        assert!(approx(center.lat, 5.0));
        assert!(approx(center.lng, 2.0));

        // the mean would be (11/3, 5/3)
        assert!(!approx(center.lat, 11.0 / 3.0));
    }

    #[test]
    fn test_extent_center_single_point() {
        let center = extent_center(&[LatLng::new(51.5, -0.12)]).unwrap();
        assert!(approx(center.lat, 51.5));
        assert!(approx(center.lng, -0.12));
    }

    #[test]
    fn test_extent_center_empty() {
        assert!(extent_center(&[]).is_none());
    }

    #[test]
    fn test_viewport_from_corners() {
        let viewport =
            Viewport::from_corners(LatLng::new(51.7, 0.3), LatLng::new(51.3, -0.5));
        assert!(approx(viewport.min_lat, 51.3));
        assert!(approx(viewport.max_lat, 51.7));
        assert!(approx(viewport.min_lon, -0.5));
        assert!(approx(viewport.max_lon, 0.3));
    }
}

//! Typed search conditions over cafe records.
//!
//! A [`Predicate`] is built once per search and then either rendered to SQL
//! with bound parameters (see `cafe_map_web::db::predicate`) or evaluated in
//! memory with [`Predicate::matches`]. Both interpretations share the same
//! tree, so the structure pinned by the tests here is the structure queried.

use serde::{Deserialize, Serialize};

use crate::geo::Viewport;
use crate::types::{Amenity, Cafe};

/// The amenity checkboxes of the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityFilter {
    #[serde(default)]
    pub toilet: bool,
    #[serde(default)]
    pub wifi: bool,
    #[serde(default)]
    pub sockets: bool,
    #[serde(default)]
    pub calls: bool,
}

impl AmenityFilter {
    /// Amenities the user asked for, in column order.
    #[must_use]
    pub fn required(&self) -> Vec<Amenity> {
        Amenity::ALL
            .into_iter()
            .filter(|amenity| match amenity {
                Amenity::Toilet => self.toilet,
                Amenity::Wifi => self.wifi,
                Amenity::Sockets => self.sockets,
                Amenity::Calls => self.calls,
            })
            .collect()
    }

    /// Whether no amenity is required.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.toilet || self.wifi || self.sockets || self.calls)
    }
}

/// A boolean condition on a cafe record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The amenity column is true.
    HasAmenity(Amenity),
    /// `min < lat < max`.
    LatBetween { min: f64, max: f64 },
    /// `min < lon < max`.
    LonBetween { min: f64, max: f64 },
    /// `location` contains the text, ignoring ASCII case.
    ///
    /// Only `A`-`Z` are folded, the same as `SQLite`'s `lower()`, so
    /// `"zürich"` does not match `"ZÜRICH"`.
    LocationContains(String),
    /// `location` equals the text exactly.
    LocationEquals(String),
    /// All of the terms hold. Empty is true.
    And(Vec<Self>),
    /// Any of the terms holds. Empty is false.
    Or(Vec<Self>),
}

impl Predicate {
    /// Conjunction of `terms`; a single term is returned as is.
    #[must_use]
    pub fn and(mut terms: Vec<Self>) -> Self {
        if terms.len() == 1 {
            if let Some(only) = terms.pop() {
                return only;
            }
        }
        Self::And(terms)
    }

    /// Disjunction of `terms`; a single term is returned as is.
    #[must_use]
    pub fn or(mut terms: Vec<Self>) -> Self {
        if terms.len() == 1 {
            if let Some(only) = terms.pop() {
                return only;
            }
        }
        Self::Or(terms)
    }

    /// Condition for the search form.
    ///
    /// Every requested amenity must be present. Without a viewport the
    /// amenities are AND'd with a substring match on `location`. With a
    /// viewport the amenities are AND'd with the bounding box instead, and
    /// that conjunction is OR'd with the substring match, so a cafe whose
    /// location mentions the text matches regardless of its amenities.
    #[must_use]
    pub fn search(filter: AmenityFilter, text: &str, viewport: Option<&Viewport>) -> Self {
        let mut terms: Vec<Self> = filter
            .required()
            .into_iter()
            .map(Self::HasAmenity)
            .collect();
        let contains = Self::LocationContains(text.to_owned());

        match viewport {
            None => {
                terms.push(contains);
                Self::and(terms)
            }
            Some(viewport) => {
                terms.push(Self::LatBetween {
                    min: viewport.min_lat,
                    max: viewport.max_lat,
                });
                terms.push(Self::LonBetween {
                    min: viewport.min_lon,
                    max: viewport.max_lon,
                });
                Self::or(vec![Self::and(terms), contains])
            }
        }
    }

    /// Exact match on `location`.
    #[must_use]
    pub fn location_equals(text: &str) -> Self {
        Self::LocationEquals(text.to_owned())
    }

    /// Evaluate the condition against a record.
    #[must_use]
    pub fn matches(&self, cafe: &Cafe) -> bool {
        match self {
            Self::HasAmenity(amenity) => cafe.amenities().has(*amenity),
            Self::LatBetween { min, max } => cafe.lat > *min && cafe.lat < *max,
            Self::LonBetween { min, max } => cafe.lon > *min && cafe.lon < *max,
            Self::LocationContains(text) => cafe
                .location
                .to_ascii_lowercase()
                .contains(&text.to_ascii_lowercase()),
            Self::LocationEquals(text) => cafe.location == *text,
            Self::And(terms) => terms.iter().all(|term| term.matches(cafe)),
            Self::Or(terms) => terms.iter().any(|term| term.matches(cafe)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CafeId;

    fn viewport() -> Viewport {
        Viewport {
            min_lat: 51.3,
            max_lat: 51.7,
            min_lon: -0.5,
            max_lon: 0.3,
        }
    }

    fn cafe(location: &str, lat: f64, lon: f64, wifi: bool) -> Cafe {
        Cafe {
            id: CafeId::new(1),
            name: "Bean".to_owned(),
            map_url: "https://maps.example/bean".to_owned(),
            img_url: "https://img.example/bean.jpg".to_owned(),
            location: location.to_owned(),
            seats: "10-20".to_owned(),
            has_toilet: false,
            has_wifi: wifi,
            has_sockets: false,
            can_take_calls: false,
            coffee_price: None,
            lat,
            lon,
        }
    }

    fn all_filters() -> impl Iterator<Item = AmenityFilter> {
        (0u8..16).map(|bits| AmenityFilter {
            toilet: bits & 1 != 0,
            wifi: bits & 2 != 0,
            sockets: bits & 4 != 0,
            calls: bits & 8 != 0,
        })
    }

    fn amenity_terms(filter: AmenityFilter) -> Vec<Predicate> {
        filter
            .required()
            .into_iter()
            .map(Predicate::HasAmenity)
            .collect()
    }

    #[test]
    fn test_required_order() {
        let filter = AmenityFilter {
            toilet: true,
            wifi: false,
            sockets: true,
            calls: true,
        };
        assert_eq!(
            filter.required(),
            vec![Amenity::Toilet, Amenity::Sockets, Amenity::Calls]
        );
        assert!(AmenityFilter::default().is_empty());
    }

    #[test]
    fn test_search_without_viewport_every_combination() {
        for filter in all_filters() {
            let predicate = Predicate::search(filter, "soho", None);

            if filter.is_empty() {
                assert_eq!(predicate, Predicate::LocationContains("soho".to_owned()));
            } else {
                let mut expected = amenity_terms(filter);
                expected.push(Predicate::LocationContains("soho".to_owned()));
                assert_eq!(predicate, Predicate::And(expected), "{filter:?}");
            }
        }
    }

    #[test]
    fn test_search_with_viewport_every_combination() {
        let viewport = viewport();
        for filter in all_filters() {
            let predicate = Predicate::search(filter, "london", Some(&viewport));

            let mut conjunction = amenity_terms(filter);
            conjunction.push(Predicate::LatBetween {
                min: 51.3,
                max: 51.7,
            });
            conjunction.push(Predicate::LonBetween {
                min: -0.5,
                max: 0.3,
            });
            let expected = Predicate::Or(vec![
                Predicate::And(conjunction),
                Predicate::LocationContains("london".to_owned()),
            ]);
            assert_eq!(predicate, expected, "{filter:?}");
        }
    }

    #[test]
    fn test_single_terms_collapse() {
        let term = Predicate::HasAmenity(Amenity::Wifi);
        assert_eq!(Predicate::and(vec![term.clone()]), term);
        assert_eq!(Predicate::or(vec![term.clone()]), term);
        assert_eq!(Predicate::and(vec![]), Predicate::And(vec![]));
    }

    #[test]
    fn test_matches_bbox_or_substring() {
        let viewport = viewport();
        let filter = AmenityFilter {
            wifi: true,
            ..AmenityFilter::default()
        };
        let predicate = Predicate::search(filter, "london", Some(&viewport));

        // inside the box with wifi
        assert!(predicate.matches(&cafe("Shoreditch", 51.5, -0.1, true)));
        // inside the box without wifi, location doesn't mention the text
        assert!(!predicate.matches(&cafe("Shoreditch", 51.5, -0.1, false)));
        // outside the box and no wifi, but the location matches
        assert!(predicate.matches(&cafe("London Bridge", 10.0, 10.0, false)));
        // on the edge of the box
        assert!(!predicate.matches(&cafe("Shoreditch", 51.7, -0.1, true)));
    }

    #[test]
    fn test_matches_substring_ignores_case() {
        let predicate = Predicate::search(AmenityFilter::default(), "LoNdOn", None);
        assert!(predicate.matches(&cafe("Central london", 0.0, 0.0, false)));
        assert!(!predicate.matches(&cafe("Paris", 0.0, 0.0, false)));
    }

    #[test]
    fn test_matches_substring_folds_ascii_only() {
        let predicate = Predicate::search(AmenityFilter::default(), "zürich", None);
        assert!(predicate.matches(&cafe("Zürich HB", 0.0, 0.0, false)));
        assert!(predicate.matches(&cafe("ZüRICH West", 0.0, 0.0, false)));
        assert!(!predicate.matches(&cafe("ZÜRICH Altstadt", 0.0, 0.0, false)));
    }

    #[test]
    fn test_matches_location_equals() {
        let predicate = Predicate::location_equals("Soho");
        assert!(predicate.matches(&cafe("Soho", 0.0, 0.0, false)));
        assert!(!predicate.matches(&cafe("soho", 0.0, 0.0, false)));
        assert!(!predicate.matches(&cafe("Soho Square", 0.0, 0.0, false)));
    }

    #[test]
    fn test_empty_combinators() {
        let sample = cafe("Soho", 0.0, 0.0, false);
        assert!(Predicate::And(vec![]).matches(&sample));
        assert!(!Predicate::Or(vec![]).matches(&sample));
    }
}

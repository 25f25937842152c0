//! HTML form payloads and their validation.
//!
//! Checkboxes are submitted only when checked, so they deserialize as
//! `Option<String>` and count as set when present.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use cafe_map_core::{Amenities, AmenityFilter, Coordinates, NewCafe};

const REQUIRED: &str = "This field is required.";
const INVALID_URL: &str = "Invalid URL.";

/// Field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, &'static str>);

impl FormErrors {
    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.insert(field, REQUIRED);
        }
    }

    fn require_url(&mut self, field: &'static str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.insert(field, REQUIRED);
        } else if !is_web_url(value) {
            self.insert(field, INVALID_URL);
        }
    }
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}

/// Search form on `/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub location: String,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
}

impl SearchForm {
    /// The amenities the user ticked.
    #[must_use]
    pub const fn filter(&self) -> AmenityFilter {
        AmenityFilter {
            toilet: self.has_toilet.is_some(),
            wifi: self.has_wifi.is_some(),
            sockets: self.has_sockets.is_some(),
            calls: self.can_take_calls.is_some(),
        }
    }
}

/// Free-text form on `/locate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocateForm {
    #[serde(default)]
    pub text_input: String,
}

impl LocateForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the field errors if the text is empty.
    pub fn validate(&self) -> Result<&str, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("text_input", &self.text_input);
        if errors.is_empty() {
            Ok(self.text_input.trim())
        } else {
            Err(errors)
        }
    }
}

/// Query string that pre-fills the add form from a geocode candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddQuery {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
}

/// Add form on `/add`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CafeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seats: String,
    #[serde(default)]
    pub coffee_price: String,
    pub has_wifi: Option<String>,
    pub has_toilet: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lng: String,
}

/// Why an add form was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejection {
    pub errors: FormErrors,
    /// Latitude or longitude is present but not a valid position.
    pub bad_coordinates: bool,
}

impl CafeForm {
    /// Pre-fill from a candidate link.
    #[must_use]
    pub fn prefill(query: AddQuery) -> Self {
        Self {
            name: query.name.unwrap_or_default(),
            map_url: query
                .place_id
                .filter(|id| !id.is_empty())
                .map(|id| format!("https://www.google.com/maps/place/?q=place_id:{id}"))
                .unwrap_or_default(),
            lat: query.lat.unwrap_or_default(),
            lng: query.lng.unwrap_or_default(),
            img_url: query.photo_url.unwrap_or_default(),
            location: query.address.unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Validate the form into a record ready to insert.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] listing every failed field.
    pub fn validate(&self) -> Result<NewCafe, Rejection> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name);
        errors.require("seats", &self.seats);
        errors.require("coffee_price", &self.coffee_price);
        errors.require("location", &self.location);
        errors.require_url("map_url", &self.map_url);
        errors.require_url("img_url", &self.img_url);
        errors.require("lat", &self.lat);
        errors.require("lng", &self.lng);

        let coordinates = if self.lat.trim().is_empty() || self.lng.trim().is_empty() {
            None
        } else {
            Some(Coordinates::parse(&self.lat, &self.lng))
        };
        let bad_coordinates = matches!(coordinates, Some(Err(_)));

        match coordinates {
            Some(Ok(position)) if errors.is_empty() => Ok(NewCafe {
                name: self.name.trim().to_string(),
                map_url: self.map_url.trim().to_string(),
                img_url: self.img_url.trim().to_string(),
                location: self.location.trim().to_string(),
                seats: self.seats.trim().to_string(),
                amenities: Amenities {
                    has_toilet: self.has_toilet.is_some(),
                    has_wifi: self.has_wifi.is_some(),
                    has_sockets: self.has_sockets.is_some(),
                    can_take_calls: self.can_take_calls.is_some(),
                },
                coffee_price: Some(self.coffee_price.trim().to_string()),
                lat: position.lat(),
                lon: position.lon(),
            }),
            _ => Err(Rejection {
                errors,
                bad_coordinates,
            }),
        }
    }
}

/// Inline price form on `/update-price/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceForm {
    #[serde(default)]
    pub coffee_price: String,
}

impl PriceForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns the field errors if the price is empty.
    pub fn validate(&self) -> Result<&str, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("coffee_price", &self.coffee_price);
        if errors.is_empty() {
            Ok(self.coffee_price.trim())
        } else {
            Err(errors)
        }
    }
}

/// Key confirmation form on `/delete/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub delete_key: String,
}

impl DeleteForm {
    /// Validate the form.
    ///
    /// The key is returned untrimmed.
    ///
    /// # Errors
    ///
    /// Returns the field errors if the key is empty.
    pub fn validate(&self) -> Result<&str, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("delete_key", &self.delete_key);
        if errors.is_empty() {
            Ok(&self.delete_key)
        } else {
            Err(errors)
        }
    }
}

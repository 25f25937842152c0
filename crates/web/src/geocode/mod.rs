//! Google Places geocoding.
//!
//! The rest of the crate talks to the provider only through the
//! [`PlaceSearch`] trait, so handlers can be exercised against a stub.
//! Every failure is a [`GeocodeError`]; callers treat it as recoverable and
//! fall back to manual entry or substring search.

pub mod types;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use cafe_map_core::Viewport;

use crate::config::GoogleMapsConfig;

pub use types::{Candidate, PlaceResult, TextSearchResponse};

/// Image shown for places without a usable photo.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://storage.googleapis.com/support-forums-api/attachment/thread-229005770-10479669858494658829.jpg";

const TEXT_SEARCH_PATH: &str = "/maps/api/place/textsearch/json";
const PHOTO_PATH: &str = "/maps/api/place/photo";
const PHOTO_MAX_WIDTH: &str = "1000";

/// Errors from the place search provider.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Transport failure or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// The provider answered with an error status in the body.
    #[error("provider status {status}: {message}")]
    Provider { status: String, message: String },

    /// A field the caller needs is absent.
    #[error("missing field in place result: {0}")]
    MissingField(&'static str),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A photo could not be resolved to a public image URL.
    #[error("photo did not resolve to an image URL")]
    UnresolvedPhoto,
}

/// A place search provider.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Run a free-text place search.
    async fn text_search(&self, query: &str) -> Result<Vec<PlaceResult>, GeocodeError>;

    /// Resolve a photo reference to a public image URL.
    async fn photo_url(&self, photo_reference: &str) -> Result<String, GeocodeError>;
}

/// Client for the Google Places web service.
#[derive(Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_base: String,
    api_key: SecretString,
}

impl std::fmt::Debug for GooglePlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePlacesClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GooglePlacesClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &GoogleMapsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, GeocodeError> {
        let key = self.api_key.expose_secret();
        let params = params.iter().copied().chain([("key", key)]);
        Ok(Url::parse_with_params(
            &format!("{}{path}", self.api_base),
            params,
        )?)
    }
}

#[async_trait]
impl PlaceSearch for GooglePlacesClient {
    #[instrument(skip(self))]
    async fn text_search(&self, query: &str) -> Result<Vec<PlaceResult>, GeocodeError> {
        let url = self.endpoint(TEXT_SEARCH_PATH, &[("query", query)])?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body: TextSearchResponse = response.json().await?;
        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                tracing::debug!(results = body.results.len(), "Text search complete");
                Ok(body.results)
            }
            _ => Err(GeocodeError::Provider {
                status: body.status,
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    #[instrument(skip(self))]
    async fn photo_url(&self, photo_reference: &str) -> Result<String, GeocodeError> {
        let url = self.endpoint(
            PHOTO_PATH,
            &[
                ("maxwidth", PHOTO_MAX_WIDTH),
                ("photo_reference", photo_reference),
            ],
        )?;
        let api_host = url.host_str().map(str::to_owned);

        // The photo endpoint redirects to the image itself
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let resolved = response.url();
        if resolved.host_str().map(str::to_owned) == api_host {
            return Err(GeocodeError::UnresolvedPhoto);
        }
        Ok(resolved.to_string())
    }
}

/// Find places matching `query`, with a resolved image for each.
///
/// Required fields of every result are checked before any photo is
/// resolved. A candidate without a photo, or whose photo cannot be
/// resolved, gets [`PLACEHOLDER_IMAGE_URL`].
///
/// # Errors
///
/// Returns the provider's error, or `GeocodeError::MissingField` if any
/// result lacks a name, place id, position or address.
#[instrument(skip(search))]
pub async fn find_places(
    search: &dyn PlaceSearch,
    query: &str,
) -> Result<Vec<Candidate>, GeocodeError> {
    let results = search.text_search(query).await?;

    let mut pending = Vec::with_capacity(results.len());
    for result in results {
        let location = result.location().ok_or(GeocodeError::MissingField("geometry.location"))?;
        let photo_reference = result.photo_reference().map(str::to_owned);
        let candidate = Candidate {
            name: result.name.ok_or(GeocodeError::MissingField("name"))?,
            place_id: result.place_id.ok_or(GeocodeError::MissingField("place_id"))?,
            location,
            address: result
                .formatted_address
                .ok_or(GeocodeError::MissingField("formatted_address"))?,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
        };
        pending.push((candidate, photo_reference));
    }

    let mut candidates = Vec::with_capacity(pending.len());
    for (mut candidate, photo_reference) in pending {
        if let Some(reference) = photo_reference {
            match search.photo_url(&reference).await {
                Ok(url) => candidate.image_url = url,
                Err(e) => {
                    tracing::warn!(error = %e, "Photo resolution failed, using placeholder");
                }
            }
        }
        candidates.push(candidate);
    }

    Ok(candidates)
}

/// Viewport of the best match for `query`.
///
/// Returns `None` when there is no result or the first result lacks a
/// complete viewport.
///
/// # Errors
///
/// Returns the provider's error.
#[instrument(skip(search))]
pub async fn find_viewport(
    search: &dyn PlaceSearch,
    query: &str,
) -> Result<Option<Viewport>, GeocodeError> {
    let results = search.text_search(query).await?;
    Ok(results.first().and_then(PlaceResult::viewport))
}

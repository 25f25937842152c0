//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use crate::config::CafeConfig;
use crate::geocode::{GooglePlacesClient, PlaceSearch};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CafeConfig,
    pool: SqlitePool,
    places: Arc<dyn PlaceSearch>,
}

impl AppState {
    /// Create application state backed by the Google Places API.
    #[must_use]
    pub fn new(config: CafeConfig, pool: SqlitePool) -> Self {
        let places = Arc::new(GooglePlacesClient::new(&config.google));
        Self::with_place_search(config, pool, places)
    }

    /// Create application state with a custom place search provider.
    #[must_use]
    pub fn with_place_search(
        config: CafeConfig,
        pool: SqlitePool,
        places: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                places,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &CafeConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get the place search provider.
    #[must_use]
    pub fn places(&self) -> &dyn PlaceSearch {
        self.inner.places.as_ref()
    }

    /// Browser key for the Maps JavaScript API.
    #[must_use]
    pub fn maps_browser_key(&self) -> &str {
        self.inner.config.google.api_key.expose_secret()
    }
}

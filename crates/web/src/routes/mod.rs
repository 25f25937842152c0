//! HTTP route handlers for the cafe map.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Pages
//! GET  /, /search              - All cafes on a map
//! POST /, /search              - Filter by amenities and location
//! GET  /cafe/{id}              - Cafe detail
//! GET  /locate                 - Free-text place lookup form
//! POST /locate                 - Show place candidates on a map
//! GET  /add                    - Add form (pre-filled from a candidate)
//! POST /add                    - Store a new cafe
//! GET  /update-price/{id}      - Cafe detail with price form
//! POST /update-price/{id}      - Store a new price
//! GET  /delete/{id}            - Cafe detail with key form
//! POST /delete/{id}            - Delete when the key matches
//! GET  /api-doc                - JSON API documentation
//!
//! # JSON API
//! GET    /api/cafe/{id}        - One cafe
//! GET    /api/all              - Every cafe
//! GET    /api/search?loc=      - Cafes at an exact location
//! POST   /api/add              - Add a cafe from query parameters
//! PATCH  /api/update-price/{id} - Set the coffee price
//! DELETE /api/delete/{id}      - Delete a cafe (requires api_key)
//! ```
//!
//! Any other path redirects to `/search`.

pub mod add;
pub mod api;
pub mod cafes;
pub mod docs;
pub mod search;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Redirect,
    routing::{delete, get, patch, post},
};

use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cafe/{id}", get(api::cafe))
        .route("/all", get(api::all))
        .route("/search", get(api::search))
        .route("/add", post(api::add))
        .route("/update-price/{id}", patch(api::update_price))
        .route("/delete/{id}", delete(api::delete))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Search
        .route("/", get(search::index).post(search::search))
        .route("/search", get(search::index).post(search::search))
        .route("/locate", get(search::locate_page).post(search::locate))
        // Cafes
        .route("/cafe/{id}", get(cafes::show))
        .route("/add", get(add::add_page).post(add::add))
        .route(
            "/update-price/{id}",
            get(cafes::update_price_page).post(cafes::update_price),
        )
        .route("/delete/{id}", get(cafes::delete_page).post(cafes::delete))
        .route("/api-doc", get(docs::api_doc))
        // JSON API
        .nest("/api", api_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn not_found() -> Redirect {
    Redirect::to("/search")
}

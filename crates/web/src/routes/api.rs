//! JSON API handlers.
//!
//! Parameters are read from the query string on every route, including the
//! mutating ones.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use cafe_map_core::{Amenities, Cafe, CafeId, NewCafe, Predicate};

use crate::db::{CafeRepository, RepositoryError};
use crate::error::{ApiError, AppError, add_breadcrumb};
use crate::services::auth::{AuthError, verify_secret_key};
use crate::state::AppState;

/// Query parameters of `GET /api/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub loc: Option<String>,
}

/// Query parameters of `POST /api/add`.
#[derive(Debug, Default, Deserialize)]
pub struct AddQuery {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub seats: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub has_sockets: Option<String>,
    pub can_take_calls: Option<String>,
    pub coffee_price: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl AddQuery {
    /// Convert into a record ready to insert.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if a required field is missing or
    /// blank, or if `lat`/`lon` are not finite numbers.
    pub fn into_new_cafe(self) -> Result<NewCafe, ApiError> {
        Ok(NewCafe {
            amenities: Amenities {
                has_toilet: flag(self.has_toilet.as_deref()),
                has_wifi: flag(self.has_wifi.as_deref()),
                has_sockets: flag(self.has_sockets.as_deref()),
                can_take_calls: flag(self.can_take_calls.as_deref()),
            },
            lat: number(self.lat.as_deref())?,
            lon: number(self.lon.as_deref())?,
            name: required(self.name)?,
            map_url: required(self.map_url)?,
            img_url: required(self.img_url)?,
            location: required(self.location)?,
            seats: required(self.seats)?,
            coffee_price: self.coffee_price.filter(|price| !price.trim().is_empty()),
        })
    }
}

/// A flag is set when present, unless it spells out a false value.
fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|value| {
        !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "off" | "no"
        )
    })
}

fn required(value: Option<String>) -> Result<String, ApiError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::BadRequest)
}

fn number(value: Option<&str>) -> Result<f64, ApiError> {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or(ApiError::BadRequest)
}

/// Query parameters of `PATCH /api/update-price/{id}`.
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub coffee_price: Option<String>,
}

/// Query parameters of `DELETE /api/delete/{id}`.
#[derive(Deserialize)]
pub struct DeleteQuery {
    pub api_key: Option<String>,
}

/// `GET /api/cafe/{id}`
#[instrument(skip(state))]
pub async fn cafe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cafe>, ApiError> {
    let id = id.parse::<CafeId>().map_err(|_| ApiError::CafeNotFound)?;
    CafeRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::CafeNotFound)
}

/// `GET /api/all`
#[instrument(skip(state))]
pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<Cafe>>, ApiError> {
    Ok(Json(CafeRepository::new(state.pool()).list_all().await?))
}

/// `GET /api/search?loc=` (exact location match)
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Cafe>>, ApiError> {
    let Some(location) = query.loc else {
        return Err(ApiError::NothingInLocation);
    };

    let cafes = CafeRepository::new(state.pool())
        .find_by_predicate(&Predicate::location_equals(&location))
        .await?;

    if cafes.is_empty() {
        Err(ApiError::NothingInLocation)
    } else {
        Ok(Json(cafes))
    }
}

/// `POST /api/add`
#[instrument(skip(state, query))]
pub async fn add(
    State(state): State<AppState>,
    Query(query): Query<AddQuery>,
) -> Result<Json<Value>, ApiError> {
    let new_cafe = query.into_new_cafe()?;
    add_breadcrumb("api", "Add cafe", Some(&[("name", new_cafe.name.as_str())]));

    let cafe = CafeRepository::new(state.pool()).insert(&new_cafe).await?;
    tracing::info!(cafe_id = %cafe.id, "Cafe added through the API");

    Ok(Json(
        json!({"response": {"success": "Successfully added the new cafe."}}),
    ))
}

/// `PATCH /api/update-price/{id}?coffee_price=`
#[instrument(skip(state))]
pub async fn update_price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Value>, ApiError> {
    let price = required(query.coffee_price)?;
    let not_found = ApiError::UnknownCafe {
        status: StatusCode::NOT_FOUND,
    };
    let Ok(id) = id.parse::<CafeId>() else {
        return Err(not_found);
    };

    match CafeRepository::new(state.pool())
        .update_price(id, &price)
        .await
    {
        Ok(()) => Ok(Json(json!({"success": "Successfully update the price."}))),
        Err(RepositoryError::NotFound) => Err(not_found),
        Err(e) => Err(e.into()),
    }
}

/// `DELETE /api/delete/{id}?api_key=`
///
/// The key is checked before the id is looked up.
#[instrument(skip(state, query))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>, ApiError> {
    let key = query.api_key.ok_or(ApiError::NotAuthorized)?;
    match verify_secret_key(&key, &state.config().secret_key_hash) {
        Ok(()) => {}
        Err(AuthError::InvalidKey) => {
            tracing::warn!("API delete rejected: wrong key");
            return Err(ApiError::NotAuthorized);
        }
        Err(e) => return Err(AppError::Auth(e).into()),
    }

    let not_found = ApiError::UnknownCafe {
        status: StatusCode::FORBIDDEN,
    };
    let Ok(id) = id.parse::<CafeId>() else {
        return Err(not_found);
    };

    match CafeRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            tracing::info!(cafe_id = %id, "Cafe deleted through the API");
            Ok(Json(json!({"success": "Successfully deleted."})))
        }
        Err(RepositoryError::NotFound) => Err(not_found),
        Err(e) => Err(e.into()),
    }
}

//! Cafe page route handlers: show, price update and delete.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use tower_sessions::Session;
use tracing::instrument;

use cafe_map_core::{Cafe, CafeId};

use crate::db::{CafeRepository, RepositoryError};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::flash::{Flash, Outcome};
use crate::forms::{DeleteForm, PriceForm};
use crate::map::{AmenityIcon, amenity_icons};
use crate::services::auth::{AuthError, verify_secret_key};
use crate::state::AppState;

/// Inline price form shown on the cafe page.
#[derive(Debug, Clone, Default)]
pub struct PriceFormView {
    pub value: String,
    pub error: Option<&'static str>,
}

/// Key confirmation form shown on the cafe page.
#[derive(Debug, Clone, Default)]
pub struct DeleteFormView {
    pub error: Option<&'static str>,
}

/// Cafe detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "show_cafe.html")]
pub struct ShowCafeTemplate {
    pub cafe: Cafe,
    pub icons: Vec<AmenityIcon>,
    pub price_form: Option<PriceFormView>,
    pub delete_form: Option<DeleteFormView>,
    pub flashes: Vec<Flash>,
}

crate::flash::impl_page!(ShowCafeTemplate);

impl ShowCafeTemplate {
    /// The cafe page without inline forms.
    #[must_use]
    pub fn new(cafe: Cafe) -> Self {
        Self {
            icons: amenity_icons(&cafe),
            cafe,
            price_form: None,
            delete_form: None,
            flashes: Vec::new(),
        }
    }

    fn with_price_form(mut self, form: PriceFormView) -> Self {
        self.price_form = Some(form);
        self
    }

    fn with_delete_form(mut self, form: DeleteFormView) -> Self {
        self.delete_form = Some(form);
        self
    }
}

/// Load the cafe named by a raw path segment.
///
/// Ids that are not integers are treated like unknown ids.
async fn load(state: &AppState, raw_id: &str) -> Result<Option<Cafe>> {
    let Ok(id) = raw_id.parse::<CafeId>() else {
        return Ok(None);
    };
    Ok(CafeRepository::new(state.pool()).get_by_id(id).await?)
}

/// Display a cafe.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let outcome = match load(&state, &id).await? {
        Some(cafe) => Outcome::page(ShowCafeTemplate::new(cafe)),
        None => Outcome::redirect_with("/search", Flash::warning("Your cafe does not exist")),
    };
    outcome.respond(&session).await
}

/// Display a cafe with its current price in an inline form.
#[instrument(skip(state, session))]
pub async fn update_price_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(cafe) = load(&state, &id).await? else {
        return cafe_missing().respond(&session).await;
    };

    let form = PriceFormView {
        value: cafe.coffee_price.clone().unwrap_or_default(),
        error: None,
    };
    Outcome::page(ShowCafeTemplate::new(cafe).with_price_form(form))
        .respond(&session)
        .await
}

/// Store a new coffee price.
#[instrument(skip(state, session, form))]
pub async fn update_price(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<PriceForm>,
) -> Result<Response> {
    let Some(mut cafe) = load(&state, &id).await? else {
        return cafe_missing().respond(&session).await;
    };

    let price = match form.validate() {
        Ok(price) => price,
        Err(errors) => {
            let view = PriceFormView {
                value: form.coffee_price.clone(),
                error: errors.get("coffee_price"),
            };
            return Outcome::page(ShowCafeTemplate::new(cafe).with_price_form(view))
                .respond(&session)
                .await;
        }
    };

    match CafeRepository::new(state.pool())
        .update_price(cafe.id, price)
        .await
    {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => return cafe_missing().respond(&session).await,
        Err(e) => return Err(e.into()),
    }

    tracing::info!(cafe_id = %cafe.id, "Coffee price updated");
    cafe.coffee_price = Some(price.to_string());
    Outcome::page(ShowCafeTemplate::new(cafe))
        .respond(&session)
        .await
}

fn cafe_missing() -> Outcome {
    Outcome::redirect_with("/search", Flash::warning("Cafe does not exist"))
}

/// Display a cafe with the delete confirmation form.
#[instrument(skip(state, session))]
pub async fn delete_page(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let outcome = match load(&state, &id).await? {
        Some(cafe) => Outcome::page(
            ShowCafeTemplate::new(cafe).with_delete_form(DeleteFormView::default()),
        ),
        None => Outcome::redirect("/search"),
    };
    outcome.respond(&session).await
}

/// Delete a cafe once the secret key checks out.
#[instrument(skip(state, session, form))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> Result<Response> {
    let Some(cafe) = load(&state, &id).await? else {
        return Outcome::redirect("/search").respond(&session).await;
    };

    let key = match form.validate() {
        Ok(key) => key,
        Err(errors) => {
            let view = DeleteFormView {
                error: errors.get("delete_key"),
            };
            return Outcome::page(ShowCafeTemplate::new(cafe).with_delete_form(view))
                .respond(&session)
                .await;
        }
    };

    match verify_secret_key(key, &state.config().secret_key_hash) {
        Ok(()) => {}
        Err(AuthError::InvalidKey) => {
            tracing::warn!(cafe_id = %cafe.id, "Delete rejected: wrong key");
            return Outcome::page_with(
                ShowCafeTemplate::new(cafe).with_delete_form(DeleteFormView::default()),
                Flash::error("Your key is not correct."),
            )
            .respond(&session)
            .await;
        }
        Err(e) => return Err(AppError::Auth(e)),
    }

    let cafe_id = cafe.id.to_string();
    add_breadcrumb("cafe", "Delete cafe", Some(&[("cafe_id", cafe_id.as_str())]));

    match CafeRepository::new(state.pool()).delete(cafe.id).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => {
            return Outcome::redirect("/search").respond(&session).await;
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(cafe_id = %cafe.id, "Cafe deleted");
    Outcome::redirect_with("/search", Flash::success("Successfully deleted."))
        .respond(&session)
        .await
}

//! Add cafe route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Response,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CafeRepository;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::flash::{Flash, Outcome};
use crate::forms::{AddQuery, CafeForm, FormErrors};
use crate::routes::cafes::ShowCafeTemplate;
use crate::state::AppState;

const HEADING: &str = "Add a new cafe!";

/// Add cafe page template.
#[derive(Template, WebTemplate)]
#[template(path = "add_cafe.html")]
pub struct AddCafeTemplate {
    pub heading: &'static str,
    pub form: CafeForm,
    pub errors: FormErrors,
    pub flashes: Vec<Flash>,
}

crate::flash::impl_page!(AddCafeTemplate);

impl AddCafeTemplate {
    fn new(form: CafeForm, errors: FormErrors) -> Self {
        Self {
            heading: HEADING,
            form,
            errors,
            flashes: Vec::new(),
        }
    }
}

/// Display the add form, pre-filled from a locate candidate.
///
/// A candidate that is already stored is shown instead of the form.
#[instrument(skip(state, session, query))]
pub async fn add_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AddQuery>,
) -> Result<Response> {
    if let Some(name) = query.name.as_deref().filter(|name| !name.is_empty())
        && let Some(cafe) = CafeRepository::new(state.pool()).get_by_name(name).await?
    {
        return Outcome::page_with(
            ShowCafeTemplate::new(cafe),
            Flash::info("Your cafe already exists, welcome to its page"),
        )
        .respond(&session)
        .await;
    }

    Outcome::page(AddCafeTemplate::new(
        CafeForm::prefill(query),
        FormErrors::default(),
    ))
    .respond(&session)
    .await
}

/// Validate and store a new cafe, then show it.
#[instrument(skip(state, session, form), fields(name = %form.name))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CafeForm>,
) -> Result<Response> {
    let new_cafe = match form.validate() {
        Ok(new_cafe) => new_cafe,
        Err(rejection) => {
            let page = AddCafeTemplate::new(form, rejection.errors);
            let outcome = if rejection.bad_coordinates {
                Outcome::page_with(
                    page,
                    Flash::warning(
                        "Please stay somewhere on the Earth, insert valid latitude and longitude",
                    ),
                )
            } else {
                Outcome::page(page)
            };
            return outcome.respond(&session).await;
        }
    };

    add_breadcrumb("cafe", "Add cafe", Some(&[("name", new_cafe.name.as_str())]));

    match CafeRepository::new(state.pool()).insert(&new_cafe).await {
        Ok(cafe) => {
            tracing::info!(cafe_id = %cafe.id, "Cafe added");
            Outcome::page(ShowCafeTemplate::new(cafe))
                .respond(&session)
                .await
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Insert failed");
            Outcome::page_with(
                AddCafeTemplate::new(form, FormErrors::default()),
                Flash::error("Something went wrong during inserting into the DB, please try again."),
            )
            .respond(&session)
            .await
        }
    }
}

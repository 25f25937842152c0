//! Search and locate route handlers.
//!
//! Both pages share `search.html`: search filters stored cafes, locate asks
//! the place provider for candidates to add.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Response};
use tower_sessions::Session;
use tracing::instrument;

use cafe_map_core::{Cafe, Predicate};

use crate::db::CafeRepository;
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::flash::{Flash, Outcome};
use crate::forms::{FormErrors, LocateForm, SearchForm};
use crate::geocode::{find_places, find_viewport};
use crate::map::MapView;
use crate::state::AppState;

/// Suffix appended to locate queries to bias results towards venues.
const LOCATE_SUFFIX: &str = " restaurant";

const MANUAL_ENTRY: &str =
    "There is some issue with getting your cafes, please insert your data manually.";

/// Search and locate page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub heading: &'static str,
    /// Show the locate form instead of the search form.
    pub locate: bool,
    pub text_input: String,
    pub errors: FormErrors,
    pub search: SearchForm,
    pub cafes: Vec<Cafe>,
    pub map_json: String,
    pub maps_key: String,
    pub flashes: Vec<Flash>,
}

crate::flash::impl_page!(SearchTemplate);

impl SearchTemplate {
    fn search(
        state: &AppState,
        heading: &'static str,
        search: SearchForm,
        cafes: Vec<Cafe>,
        map: &MapView,
    ) -> Result<Self> {
        Ok(Self {
            heading,
            locate: false,
            text_input: String::new(),
            errors: FormErrors::default(),
            search,
            cafes,
            map_json: map.to_json()?,
            maps_key: state.maps_browser_key().to_string(),
            flashes: Vec::new(),
        })
    }

    fn locate(
        state: &AppState,
        heading: &'static str,
        text_input: String,
        errors: FormErrors,
        map: &MapView,
    ) -> Result<Self> {
        Ok(Self {
            heading,
            locate: true,
            text_input,
            errors,
            search: SearchForm::default(),
            cafes: Vec::new(),
            map_json: map.to_json()?,
            maps_key: state.maps_browser_key().to_string(),
            flashes: Vec::new(),
        })
    }
}

/// List every cafe, or send the user to add one if there are none.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cafes = CafeRepository::new(state.pool()).list_all().await?;

    let outcome = if cafes.is_empty() {
        Outcome::redirect_with(
            "/locate",
            Flash::info("There is no cafe in the DB, please insert a new one"),
        )
    } else {
        let map = MapView::for_cafes(&cafes)?;
        Outcome::page(SearchTemplate::search(
            &state,
            "All cafes",
            SearchForm::default(),
            cafes,
            &map,
        )?)
    };

    outcome.respond(&session).await
}

/// Filter cafes by amenities and, when given, by location.
///
/// The location is resolved to a viewport by the place provider. Without a
/// viewport (provider failure or incomplete result) only the flags and the
/// location substring are used.
#[instrument(skip(state, session, form), fields(location = %form.location))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SearchForm>,
) -> Result<Response> {
    let filter = form.filter();
    let location = form.location.trim();

    let viewport = if location.is_empty() {
        None
    } else {
        match find_viewport(state.places(), location).await {
            Ok(viewport) => viewport,
            Err(e) => {
                tracing::warn!(error = %e, "Viewport lookup failed, matching location text only");
                None
            }
        }
    };

    let predicate = Predicate::search(filter, location, viewport.as_ref());
    let cafes = CafeRepository::new(state.pool())
        .find_by_predicate(&predicate)
        .await?;
    tracing::info!(results = cafes.len(), "Search completed");

    let page = if cafes.is_empty() {
        SearchTemplate::search(&state, "Nothing found", form, cafes, &MapView::empty())?
    } else {
        let map = MapView::for_cafes(&cafes)?;
        SearchTemplate::search(&state, "Your cafes", form, cafes, &map)?
    };

    Outcome::page(page).respond(&session).await
}

/// Locate form with an empty map.
#[instrument(skip(state, session))]
pub async fn locate_page(State(state): State<AppState>, session: Session) -> Result<Response> {
    let page = SearchTemplate::locate(
        &state,
        "Add a new cafe",
        String::new(),
        FormErrors::default(),
        &MapView::empty(),
    )?;
    Outcome::page(page).respond(&session).await
}

/// Look up candidate places for free text and show them on a map.
#[instrument(skip(state, session, form), fields(text = %form.text_input))]
pub async fn locate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LocateForm>,
) -> Result<Response> {
    let text = match form.validate() {
        Ok(text) => text,
        Err(errors) => {
            let page = SearchTemplate::locate(
                &state,
                "Add a new cafe",
                form.text_input.clone(),
                errors,
                &MapView::empty(),
            )?;
            return Outcome::page(page).respond(&session).await;
        }
    };

    add_breadcrumb("locate", "Place lookup", Some(&[("text", text)]));

    let query = format!("{text}{LOCATE_SUFFIX}");
    let candidates = match find_places(state.places(), &query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(error = %e, "Place lookup failed");
            return Outcome::redirect_with("/add", Flash::warning(MANUAL_ENTRY))
                .respond(&session)
                .await;
        }
    };

    let map = MapView::for_candidates(&candidates)?;
    let page = SearchTemplate::locate(
        &state,
        "Confirm cafe",
        text.to_string(),
        FormErrors::default(),
        &map,
    )?;
    Outcome::page(page).respond(&session).await
}

//! API documentation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Response};
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::flash::{Flash, Outcome};
use crate::state::AppState;

/// API documentation page template.
#[derive(Template, WebTemplate)]
#[template(path = "api_doc.html")]
pub struct ApiDocTemplate {
    pub base_url: String,
    pub flashes: Vec<Flash>,
}

crate::flash::impl_page!(ApiDocTemplate);

/// Display the JSON API documentation.
pub async fn api_doc(State(state): State<AppState>, session: Session) -> Result<Response> {
    let base_url = state.config().base_url.trim_end_matches('/').to_string();
    Outcome::page(ApiDocTemplate {
        base_url,
        flashes: Vec::new(),
    })
    .respond(&session)
    .await
}

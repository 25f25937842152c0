//! One-shot user messages and the handler result type that carries them.
//!
//! Handlers return an [`Outcome`]: either a page to render now or a redirect.
//! A flash attached to a page is shown on that page; a flash attached to a
//! redirect is stored in the session and shown on the next rendered page.

use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;

const FLASH_SESSION_KEY: &str = "flashes";

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    /// CSS class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message shown once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Queue a flash for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn push(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Flash> = session.get(FLASH_SESSION_KEY).await?.unwrap_or_default();
    pending.push(flash);
    session.insert(FLASH_SESSION_KEY, pending).await
}

/// Remove and return every queued flash.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take(session: &Session) -> Result<Vec<Flash>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Flash>>(FLASH_SESSION_KEY)
        .await?
        .unwrap_or_default())
}

/// A rendered page that displays flashes.
pub trait Page: Send + 'static {
    /// Flashes shown by the page's template.
    fn flashes_mut(&mut self) -> &mut Vec<Flash>;

    /// Build the HTTP response.
    fn respond(self: Box<Self>) -> Response;
}

/// Implement [`Page`] for askama templates with a `flashes` field.
macro_rules! impl_page {
    ($($template:ty),+ $(,)?) => {
        $(
            impl $crate::flash::Page for $template {
                fn flashes_mut(&mut self) -> &mut Vec<$crate::flash::Flash> {
                    &mut self.flashes
                }

                fn respond(self: Box<Self>) -> ::axum::response::Response {
                    ::axum::response::IntoResponse::into_response(*self)
                }
            }
        )+
    };
}

pub(crate) use impl_page;

/// Result of an HTML handler.
pub enum Outcome {
    /// Render a page now.
    Page {
        page: Box<dyn Page>,
        flash: Option<Flash>,
    },
    /// Redirect, showing the flash on the next page.
    Redirect { to: String, flash: Option<Flash> },
}

impl Outcome {
    #[must_use]
    pub fn page(page: impl Page) -> Self {
        Self::Page {
            page: Box::new(page),
            flash: None,
        }
    }

    #[must_use]
    pub fn page_with(page: impl Page, flash: Flash) -> Self {
        Self::Page {
            page: Box::new(page),
            flash: Some(flash),
        }
    }

    #[must_use]
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            flash: None,
        }
    }

    #[must_use]
    pub fn redirect_with(to: impl Into<String>, flash: Flash) -> Self {
        Self::Redirect {
            to: to.into(),
            flash: Some(flash),
        }
    }

    /// Turn the outcome into a response, moving flashes through the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn respond(self, session: &Session) -> Result<Response, AppError> {
        match self {
            Self::Page { mut page, flash } => {
                let mut flashes = take(session).await?;
                flashes.extend(flash);
                page.flashes_mut().extend(flashes);
                Ok(page.respond())
            }
            Self::Redirect { to, flash } => {
                if let Some(flash) = flash {
                    push(session, flash).await?;
                }
                Ok(Redirect::to(&to).into_response())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower_sessions::MemoryStore;

    use super::*;

    struct TestPage {
        flashes: Vec<Flash>,
    }

    impl Page for TestPage {
        fn flashes_mut(&mut self) -> &mut Vec<Flash> {
            &mut self.flashes
        }

        fn respond(self: Box<Self>) -> Response {
            let messages: Vec<_> = self.flashes.into_iter().map(|f| f.message).collect();
            messages.join("|").into_response()
        }
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_redirect_flash_shows_on_next_page() {
        let session = session();

        let response = Outcome::redirect_with("/search", Flash::success("Successfully deleted."))
            .respond(&session)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/search");

        let response = Outcome::page_with(
            TestPage { flashes: vec![] },
            Flash::info("All cafes"),
        )
        .respond(&session)
        .await
        .unwrap();
        assert_eq!(body(response).await, "Successfully deleted.|All cafes");

        // drained
        let response = Outcome::page(TestPage { flashes: vec![] })
            .respond(&session)
            .await
            .unwrap();
        assert_eq!(body(response).await, "");
    }

    #[tokio::test]
    async fn test_flashes_accumulate() {
        let session = session();
        push(&session, Flash::warning("one")).await.unwrap();
        push(&session, Flash::error("two")).await.unwrap();

        let flashes = take(&session).await.unwrap();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[1].level, Level::Error);
        assert!(take(&session).await.unwrap().is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Flash::warning("careful")).unwrap();
        assert_eq!(json, r#"{"level":"warning","message":"careful"}"#);
        assert_eq!(Level::Success.as_str(), "success");
    }
}

//! Unified error handling with Sentry integration.
//!
//! HTML handlers return `Result<T, AppError>`; anything that reaches
//! `AppError` is a server fault and is captured to Sentry. Expected outcomes
//! such as a missing cafe or a wrong key are handled inside the handlers.
//!
//! JSON handlers return [`ApiError`], whose payloads are part of the public
//! API and must not change shape.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for HTML handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Secret key verification failed unexpectedly.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Map data could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error responses of the JSON API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `GET /api/cafe/{id}` for an unknown id.
    #[error("cafe not found")]
    CafeNotFound,

    /// `GET /api/search` matched nothing.
    #[error("nothing in location")]
    NothingInLocation,

    /// Missing or malformed parameters.
    #[error("bad request")]
    BadRequest,

    /// `PATCH` or `DELETE` on an unknown id.
    #[error("cafe not found")]
    UnknownCafe {
        /// Status the route answers with.
        status: StatusCode,
    },

    /// Wrong or missing API key.
    #[error("not authorized")]
    NotAuthorized,

    /// Server-side failure.
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(AppError::Database(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::CafeNotFound => (
                StatusCode::NOT_FOUND,
                json!({"error": {"Not Found": "Sorry, a cafe with that id is not in the database."}}),
            ),
            Self::NothingInLocation => (
                StatusCode::OK,
                json!({"error": {"Not Found": "Sorry, we do not have anything in your location"}}),
            ),
            Self::BadRequest => (
                StatusCode::BAD_REQUEST,
                json!({"error": {"Bad Request": "Some or all fields were incorrect or missing."}}),
            ),
            Self::UnknownCafe { status } => (
                status,
                json!({"error": {"Not found": "Sorry, a cafe with that id is not in the database."}}),
            ),
            Self::NotAuthorized => (
                StatusCode::FORBIDDEN,
                json!({"error": {"Not authorized": "Sorry, you are not allowed to permit this operation."}}),
            ),
            Self::Internal(err) => return err.into_response(),
        };

        (status, Json(body)).into_response()
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_is_internal_server_error() {
        let response = AppError::Database(RepositoryError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_api_error_payloads() {
        let response = ApiError::CafeNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": {"Not Found": "Sorry, a cafe with that id is not in the database."}})
        );

        let response = ApiError::NothingInLocation.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["error"]["Not Found"],
            "Sorry, we do not have anything in your location"
        );

        let response = ApiError::UnknownCafe {
            status: StatusCode::FORBIDDEN,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_json(response).await["error"]["Not found"].is_string());
    }

    #[tokio::test]
    async fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotAuthorized.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(RepositoryError::NotFound).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

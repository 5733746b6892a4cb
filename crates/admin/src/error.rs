//! Unified error handling for the admin server.
//!
//! Page handlers return [`AppError`]; JSON actions return the
//! [`Response`] envelope through [`envelope`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as HttpResponse},
};
use serde::Serialize;
use thiserror::Error;

use tradepost_core::{ActionError, Page, Response};

use crate::db::RepositoryError;
use crate::services::AuthError;

/// Application-level error type for page handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Like `From<RepositoryError>`, but names the entity on not-found.
    #[must_use]
    pub fn from_repository(err: RepositoryError, entity: &str) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(entity.to_string()),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(e) => Self::Database(e),
            e if e.is_unauthorized() => Self::Unauthorized(e.to_string()),
            e => Self::Internal(e.to_string()),
        }
    }
}

impl From<ActionError> for AppError {
    fn from(err: ActionError) -> Self {
        use tradepost_core::ErrorCode;

        match err.code {
            ErrorCode::NotFound => Self::NotFound(err.message),
            ErrorCode::Unauthorized => Self::Unauthorized(err.message),
            ErrorCode::Forbidden => Self::Forbidden(err.message),
            ErrorCode::BadRequest | ErrorCode::Validation | ErrorCode::Conflict => {
                Self::BadRequest(err.message)
            }
            ErrorCode::Internal => Self::Internal(err.message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> HttpResponse {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Template(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) | Self::Template(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// JSON action result: the envelope plus its HTTP status.
pub type ActionResponse<T> = (StatusCode, Json<Response<T>>);

/// Wrap an action result in the envelope with a matching status code.
pub fn envelope<T: Serialize>(result: Result<T, ActionError>) -> ActionResponse<T> {
    respond(Response::from(result))
}

/// Like [`envelope`] for listings, adding `currPage`/`totalPages`.
pub fn paginated<T: Serialize>(result: Result<Page<T>, ActionError>) -> ActionResponse<Vec<T>> {
    respond(result.map_or_else(Response::from, Response::paginated))
}

fn respond<T>(response: Response<T>) -> ActionResponse<T> {
    let status =
        StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        sentry::capture_message(
            response.message.as_deref().unwrap_or("action failed"),
            sentry::Level::Error,
        );
    }
    (status, Json(response))
}

/// Set the Sentry user context for the current scope.
pub fn set_sentry_user(user_id: i32, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 12".to_string());
        assert_eq!(err.to_string(), "Not found: order 12");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn repository_not_found_names_entity() {
        let err = AppError::from_repository(RepositoryError::NotFound, "vehicle 3");
        assert_eq!(err.to_string(), "Not found: vehicle 3");
    }

    #[test]
    fn auth_errors_are_unauthorized() {
        assert_eq!(
            get_status(AuthError::TokenExpired.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::Hashing("boom".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn envelope_status_follows_error_code() {
        let (status, Json(body)) = envelope::<i32>(Err(ActionError::not_found("color")));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("color not found"));

        let (status, Json(body)) = envelope(Ok(5));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data, Some(5));
    }

    #[test]
    fn paginated_envelope_carries_page_numbers() {
        let page = Page::new(vec!["a", "b"], 12, tradepost_core::Pagination::new(2, 5));
        let (status, Json(body)) = paginated(Ok(page));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.curr_page, Some(2));
        assert_eq!(body.total_pages, Some(3));
        assert_eq!(body.data.map(|d| d.len()), Some(2));
    }
}

//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding. Every failure on this API responds with a JSON
//! body of the shape `{"error": "..."}` and an appropriate status code; all
//! external-service errors are caught at the request boundary and translated
//! here - none propagate unhandled.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::ACCESS_DENIED_MESSAGE;
use crate::services::reconcile::ReconcileError;
use crate::supabase::SupabaseError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// The auth service rejected the credentials.
    #[error("Auth error: {0}")]
    Auth(SupabaseError),

    /// Non-admin caller on an admin-only route.
    #[error("Access denied")]
    AccessDenied,

    /// Missing or malformed required request fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reconciliation exhausted every path without resolving a profile.
    #[error("Could not create or find user record")]
    UserUnresolvable,

    /// Data service operation failed.
    #[error("Data service error: {0}")]
    DataService(#[from] SupabaseError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ReconcileError> for AppError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::Unresolvable => Self::UserUnresolvable,
            ReconcileError::Store(store) => Self::DataService(store),
        }
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::UserUnresolvable => StatusCode::BAD_REQUEST,
            Self::DataService(err) => match err {
                // Upstream rejections carry their own message at 400;
                // transport and parse failures are ours to own at 500.
                SupabaseError::Api { .. } => StatusCode::BAD_REQUEST,
                SupabaseError::Http(_) | SupabaseError::Parse(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Self::Auth(SupabaseError::Api { message, .. }) => message.clone(),
            Self::Auth(_) => "Authentication failed".to_string(),
            Self::AccessDenied => ACCESS_DENIED_MESSAGE.to_string(),
            Self::Validation(message) => message.clone(),
            Self::UserUnresolvable => "Could not create or find user record".to_string(),
            Self::DataService(SupabaseError::Api { message, .. }) => message.clone(),
            // Don't expose internal error details to clients
            Self::DataService(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl AppError {
    /// Whether this failure is ours rather than the caller's.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) | Self::Session(_) => true,
            Self::DataService(err) => {
                matches!(err, SupabaseError::Http(_) | SupabaseError::Parse(_))
            }
            _ => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(SupabaseError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::AccessDenied), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::Validation("All fields are required".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::UserUnresolvable),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_rejection_is_bad_request() {
        let err = AppError::DataService(SupabaseError::Api {
            status: 409,
            message: "duplicate key value".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_failure_is_internal() {
        let err = AppError::DataService(SupabaseError::Parse("bad body".to_string()));
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_reconcile_error_conversion() {
        let err: AppError = ReconcileError::Unresolvable.into();
        assert!(matches!(err, AppError::UserUnresolvable));
    }
}

//! Supabase clients: auth (GoTrue) and the PostgREST data service.
//!
//! The portal owns no storage. Identities live in Supabase Auth; the
//! `users` and `feedback` tables live behind PostgREST with row-level
//! security. Every call is authorized by a bearer token: either the
//! caller's delegated access token (RLS applies as that user) or the
//! service-role key (elevated, RLS bypass) for reconciliation and the
//! admin-only reads.

pub mod auth;
pub mod feedback;
pub mod users;

pub use auth::{AuthClient, AuthSession, AuthUser};
pub use feedback::FeedbackStore;
pub use users::UserStore;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when calling Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code of the rejection.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Build an HTTP client with the project `apikey` header preinstalled.
///
/// # Panics
///
/// Panics if the API key contains invalid header characters.
pub(crate) fn build_client(anon_key: &str) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        "apikey",
        HeaderValue::from_str(anon_key).expect("Invalid API key for header"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .expect("Failed to build HTTP client")
}

/// Turn a non-success response into a `SupabaseError::Api`.
///
/// Supabase components disagree on the error body shape (GoTrue uses `msg`
/// or `error_description`, PostgREST uses `message`); try the known keys and
/// fall back to the raw body.
pub(crate) async fn error_for_response(response: reqwest::Response) -> SupabaseError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or(body);
    SupabaseError::Api { status, message }
}

/// Parse a successful JSON response body.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SupabaseError> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| SupabaseError::Parse(format!("failed to parse response: {e}")))
}

/// Extract an error message from a Supabase error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(message) = value.get(key).and_then(serde_json::Value::as_str) {
            return Some(message.to_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_gotrue() {
        let body = r#"{"code":400,"msg":"Invalid login credentials"}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Invalid login credentials")
        );
    }

    #[test]
    fn test_extract_error_message_postgrest() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint","details":null,"hint":null}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("duplicate key value violates unique constraint")
        );
    }

    #[test]
    fn test_extract_error_message_unknown_shape() {
        assert_eq!(extract_error_message("not json"), None);
        assert_eq!(extract_error_message(r#"{"weird":true}"#), None);
    }
}

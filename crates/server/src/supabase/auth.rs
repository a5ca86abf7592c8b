//! Supabase Auth (GoTrue) client.
//!
//! Sign-up and password sign-in. Password storage, verification emails, and
//! token issuance all happen inside the managed service; this client only
//! shapes the requests and surfaces the service's own error messages.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::config::SupabaseConfig;

use super::{SupabaseError, error_for_response, parse_json};

/// An authenticated identity as reported by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Stable opaque identifier.
    pub id: String,
    /// Email address the identity was created with.
    pub email: String,
}

/// A successful password sign-in: the identity plus its delegated token.
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    /// Delegated access credential for row-level-authorized data calls.
    #[serde(deserialize_with = "secret_token")]
    pub access_token: SecretString,
    /// The authenticated identity.
    pub user: AuthUser,
}

/// Wrap the issued token in a `SecretString` as it comes off the wire.
fn secret_token<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Signup responses differ by project settings: with email confirmation on,
/// GoTrue returns the bare user object; with autoconfirm, a full session.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignupBody {
    Session { user: AuthUser },
    User(AuthUser),
}

/// Supabase Auth client.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    signup_url: String,
    token_url: String,
}

impl AuthClient {
    /// Create a new auth client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: super::build_client(&config.anon_key),
            signup_url: config.endpoint("auth/v1/signup"),
            token_url: config.endpoint("auth/v1/token?grant_type=password"),
        }
    }

    /// Create a new auth identity.
    ///
    /// The supplied display name is stored as user metadata; no session is
    /// established here.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Api` with the service's message if the signup
    /// is rejected (weak password, existing account, ...).
    #[instrument(skip(self, password, name))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, SupabaseError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });

        let response = self.client.post(&self.signup_url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let body: SignupBody = parse_json(response).await?;
        Ok(match body {
            SignupBody::Session { user } | SignupBody::User(user) => user,
        })
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Api` with the service's message on bad
    /// credentials or an unconfirmed account.
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self.client.post(&self.token_url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        parse_json(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_signup_body_bare_user() {
        let body = r#"{"id":"u-1","aud":"authenticated","email":"a@b.c"}"#;
        let parsed: SignupBody = serde_json::from_str(body).unwrap();
        let SignupBody::User(user) = parsed else {
            panic!("expected bare user");
        };
        assert_eq!(user.id, "u-1");
    }

    #[test]
    fn test_signup_body_with_session() {
        let body = r#"{"access_token":"tok","user":{"id":"u-2","email":"a@b.c"}}"#;
        let parsed: SignupBody = serde_json::from_str(body).unwrap();
        let SignupBody::Session { user } = parsed else {
            panic!("expected session");
        };
        assert_eq!(user.id, "u-2");
    }

    #[test]
    fn test_auth_session_deserializes_token() {
        let body = r#"{"access_token":"delegated","token_type":"bearer","user":{"id":"u-3","email":"a@b.c"}}"#;
        let session: AuthSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.access_token.expose_secret(), "delegated");
        assert_eq!(session.user.email, "a@b.c");
    }
}

//! Users table access via PostgREST.
//!
//! All operations here run with the elevated service-role credential: profile
//! reconciliation has to see and repair rows regardless of row-level policy,
//! and a signup has to create the profile before the user ever holds a
//! delegated token.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use campus_voice_core::{Email, UserId};

use crate::config::SupabaseConfig;
use crate::models::UserProfile;
use crate::services::reconcile::UserDirectory;

use super::{SupabaseError, error_for_response, parse_json};

/// Elevated store for the `users(id, email, name, is_admin)` table.
#[derive(Clone)]
pub struct UserStore {
    client: reqwest::Client,
    users_url: String,
    service_role_key: SecretString,
}

impl UserStore {
    /// Create a new user store.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: super::build_client(&config.anon_key),
            users_url: config.endpoint("rest/v1/users"),
            service_role_key: config.service_role_key.clone(),
        }
    }

    /// Fetch at most one profile matching a PostgREST filter.
    async fn fetch_one(
        &self,
        filter: (&str, String),
    ) -> Result<Option<UserProfile>, SupabaseError> {
        let response = self
            .client
            .get(&self.users_url)
            .bearer_auth(self.service_role_key.expose_secret())
            .query(&[("select", "*".to_owned()), (filter.0, filter.1)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let rows: Vec<UserProfile> = parse_json(response).await?;
        Ok(rows.into_iter().next())
    }
}

impl UserDirectory for UserStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, SupabaseError> {
        self.fetch_one(("id", format!("eq.{id}"))).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserProfile>, SupabaseError> {
        self.fetch_one(("email", format!("eq.{email}"))).await
    }

    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, SupabaseError> {
        let response = self
            .client
            .post(&self.users_url)
            .bearer_auth(self.service_role_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(&[profile])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let rows: Vec<UserProfile> = parse_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::Parse("insert returned no rows".to_owned()))
    }

    async fn mark_admin(&self, id: &UserId, name: &str) -> Result<(), SupabaseError> {
        #[derive(Serialize)]
        struct AdminPatch<'a> {
            is_admin: bool,
            name: &'a str,
        }

        let response = self
            .client
            .patch(&self.users_url)
            .bearer_auth(self.service_role_key.expose_secret())
            .header("Prefer", "return=minimal")
            .query(&[("id", format!("eq.{id}"))])
            .json(&AdminPatch {
                is_admin: true,
                name,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        Ok(())
    }
}

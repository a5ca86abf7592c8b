//! Feedback table access via PostgREST.
//!
//! Writes and per-student reads carry the caller's delegated token so
//! row-level security applies as that user; the admin-only corpus reads run
//! with the elevated service-role credential.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use campus_voice_core::{Sentiment, UserId};

use crate::config::SupabaseConfig;
use crate::models::{FeedbackEntry, NewFeedback};

use super::{SupabaseError, error_for_response, parse_json};

/// Store for the `feedback` table.
#[derive(Clone)]
pub struct FeedbackStore {
    client: reqwest::Client,
    feedback_url: String,
    service_role_key: SecretString,
}

/// Projection row for the stats query (`select=sentiment`).
#[derive(Debug, Deserialize)]
struct SentimentRow {
    sentiment: Sentiment,
}

impl FeedbackStore {
    /// Create a new feedback store.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: super::build_client(&config.anon_key),
            feedback_url: config.endpoint("rest/v1/feedback"),
            service_role_key: config.service_role_key.clone(),
        }
    }

    /// Insert a classified feedback entry as the submitting user.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Api` if the data service rejects the insert
    /// (row-level policy, schema mismatch).
    #[instrument(skip_all, fields(faculty = %row.faculty_name))]
    pub async fn insert(
        &self,
        access_token: &SecretString,
        row: &NewFeedback,
    ) -> Result<FeedbackEntry, SupabaseError> {
        let response = self
            .client
            .post(&self.feedback_url)
            .bearer_auth(access_token.expose_secret())
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let rows: Vec<FeedbackEntry> = parse_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::Parse("insert returned no rows".to_owned()))
    }

    /// Fetch the complete corpus, newest first (elevated).
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<FeedbackEntry>, SupabaseError> {
        let response = self
            .client
            .get(&self.feedback_url)
            .bearer_auth(self.service_role_key.expose_secret())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        parse_json(response).await
    }

    /// Fetch only the sentiment column across the corpus (elevated).
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` if the query fails.
    pub async fn sentiments(&self) -> Result<Vec<Sentiment>, SupabaseError> {
        let response = self
            .client
            .get(&self.feedback_url)
            .bearer_auth(self.service_role_key.expose_secret())
            .query(&[("select", "sentiment")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        let rows: Vec<SentimentRow> = parse_json(response).await?;
        Ok(rows.into_iter().map(|r| r.sentiment).collect())
    }

    /// Fetch one student's entries, newest first, as that student.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError` if the query fails.
    pub async fn list_for_student(
        &self,
        access_token: &SecretString,
        student_id: &UserId,
    ) -> Result<Vec<FeedbackEntry>, SupabaseError> {
        let response = self
            .client
            .get(&self.feedback_url)
            .bearer_auth(access_token.expose_secret())
            .query(&[
                ("select", "*".to_owned()),
                ("student_id", format!("eq.{student_id}")),
                ("order", "created_at.desc".to_owned()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await);
        }

        parse_json(response).await
    }
}

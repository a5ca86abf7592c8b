//! Feedback route handlers.
//!
//! Submission classifies before persisting; the admin routes read the whole
//! corpus with the elevated credential and recompute their answers on every
//! request - there is no caching layer to invalidate.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::models::{FeedbackEntry, NewFeedback};
use crate::services::analytics::{self, AnalyticsReport, FeedbackStats};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Feedback submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub faculty_name: Option<String>,
    pub subject: Option<String>,
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Submission response: the stored record including its assigned sentiment.
#[derive(Debug, Serialize)]
pub struct SubmitFeedbackResponse {
    pub message: String,
    pub feedback: FeedbackEntry,
}

/// Entry-list response used by `all` and `my-feedback`.
#[derive(Debug, Serialize)]
pub struct FeedbackListResponse {
    pub feedback: Vec<FeedbackEntry>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Classify and persist a feedback entry.
///
/// POST /api/feedback/submit
///
/// Classification is best-effort: a failing model degrades to the fallback
/// label and the submission still succeeds.
#[instrument(skip_all, fields(user = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<Json<SubmitFeedbackResponse>> {
    let (faculty_name, subject, feedback_text) = match (
        non_empty(req.faculty_name),
        non_empty(req.subject),
        non_empty(req.feedback_text),
    ) {
        (Some(f), Some(s), Some(t)) => (f, s, t),
        _ => return Err(AppError::Validation("All fields are required".into())),
    };

    let sentiment = state.classifier().classify(&feedback_text).await;

    let row = NewFeedback {
        student_id: user.id.clone(),
        student_name: (!req.is_anonymous).then(|| user.name.clone()),
        faculty_name,
        subject,
        feedback_text,
        is_anonymous: req.is_anonymous,
        sentiment,
    };

    let stored = state.feedback().insert(&user.access_token, &row).await?;

    Ok(Json(SubmitFeedbackResponse {
        message: "Feedback submitted successfully!".to_string(),
        feedback: stored,
    }))
}

/// The full corpus, newest first.
///
/// GET /api/feedback/all (admin only)
#[instrument(skip_all)]
pub async fn all(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<FeedbackListResponse>> {
    let feedback = state.feedback().list_all().await?;
    Ok(Json(FeedbackListResponse { feedback }))
}

/// Corpus-wide sentiment totals.
///
/// GET /api/feedback/stats (admin only)
#[instrument(skip_all)]
pub async fn stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<FeedbackStats>> {
    let sentiments = state.feedback().sentiments().await?;
    Ok(Json(analytics::sentiment_stats(&sentiments)))
}

/// The caller's own entries, newest first.
///
/// GET /api/feedback/my-feedback
#[instrument(skip_all, fields(user = %user.id))]
pub async fn my_feedback(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<FeedbackListResponse>> {
    let feedback = state
        .feedback()
        .list_for_student(&user.access_token, &user.id)
        .await?;
    Ok(Json(FeedbackListResponse { feedback }))
}

/// Keyword, faculty, and subject analytics over the corpus.
///
/// GET /api/feedback/analytics (admin only)
#[instrument(skip_all)]
pub async fn analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>> {
    let entries = state.feedback().list_all().await?;
    Ok(Json(analytics::aggregate(&entries)))
}

/// Trim a request field, treating blank as absent.
fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_accepts_camel_case() {
        let body = r#"{
            "facultyName": "Dr. X",
            "subject": "Math",
            "feedbackText": "The projector is broken and wifi is down",
            "isAnonymous": true
        }"#;

        let req: SubmitFeedbackRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.faculty_name.as_deref(), Some("Dr. X"));
        assert!(req.is_anonymous);
    }

    #[test]
    fn test_submit_request_defaults_anonymous_to_false() {
        let body = r#"{"facultyName": "Dr. X", "subject": "Math", "feedbackText": "ok"}"#;
        let req: SubmitFeedbackRequest = serde_json::from_str(body).unwrap();
        assert!(!req.is_anonymous);
    }

    #[test]
    fn test_non_empty_requires_content_after_trim() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("Math".to_string())), Some("Math".to_string()));
    }
}

//! Feedback entry domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_voice_core::{Sentiment, UserId};

/// A persisted feedback entry.
///
/// Matches the `feedback` table row shape; immutable after creation. The
/// submitting user's id is always stored, but `student_name` is `None` when
/// the student asked for anonymous display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    /// Row identifier assigned by the data service.
    pub id: Uuid,
    /// Submitting user's id (stored even for anonymous entries).
    pub student_id: UserId,
    /// Display name, suppressed for anonymous submissions.
    pub student_name: Option<String>,
    /// Faculty member the feedback is about (free text).
    pub faculty_name: String,
    /// Subject/course (free text).
    pub subject: String,
    /// The feedback body (free text).
    pub feedback_text: String,
    /// Whether the student asked for anonymous display.
    pub is_anonymous: bool,
    /// Sentiment label assigned before persistence.
    pub sentiment: Sentiment,
    /// Creation timestamp; entries are displayed newest first.
    pub created_at: DateTime<Utc>,
}

/// A feedback entry about to be persisted.
///
/// The data service assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFeedback {
    pub student_id: UserId,
    pub student_name: Option<String>,
    pub faculty_name: String,
    pub subject: String,
    pub feedback_text: String,
    pub is_anonymous: bool,
    pub sentiment: Sentiment,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_persisted_shape() {
        let entry = FeedbackEntry {
            id: Uuid::nil(),
            student_id: UserId::new("u-1"),
            student_name: None,
            faculty_name: "Dr. X".to_string(),
            subject: "Math".to_string(),
            feedback_text: "The projector is broken".to_string(),
            is_anonymous: true,
            sentiment: Sentiment::Negative,
            created_at: DateTime::<Utc>::MIN_UTC,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["student_id"], "u-1");
        assert_eq!(json["student_name"], serde_json::Value::Null);
        assert_eq!(json["sentiment"], "negative");
        assert_eq!(json["is_anonymous"], true);
    }
}

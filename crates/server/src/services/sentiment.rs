//! Sentiment classification for submitted feedback.
//!
//! One fixed instruction prompt, one external call, single attempt. A
//! failing or misbehaving model must never block a submission: every path
//! out of here produces a label.

use tracing::{instrument, warn};

use campus_voice_core::Sentiment;

use crate::gemini::GeminiClient;

/// Fixed instruction prompt forcing a one-word categorical answer.
const CLASSIFY_INSTRUCTION: &str = "Analyze the following student feedback and categorize it as \
either \"positive\", \"negative\", or \"neutral\".\n\
Respond with ONLY one word: positive, negative, or neutral.";

/// Build the full classification prompt for one piece of feedback.
fn build_prompt(feedback_text: &str) -> String {
    format!("{CLASSIFY_INSTRUCTION}\n\nFeedback: \"{feedback_text}\"")
}

/// Classifies feedback text ahead of persistence.
#[derive(Clone)]
pub struct SentimentClassifier {
    gemini: GeminiClient,
}

impl SentimentClassifier {
    /// Create a new classifier over a Gemini client.
    #[must_use]
    pub const fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Classify one piece of feedback.
    ///
    /// The raw model response is trimmed, case-folded, and checked against
    /// the closed label set. Anything else - including call failures - is
    /// deliberately invisible to the submitter and resolves to
    /// [`Sentiment::FALLBACK`].
    #[instrument(skip_all)]
    pub async fn classify(&self, feedback_text: &str) -> Sentiment {
        match self.gemini.generate_content(&build_prompt(feedback_text)).await {
            Ok(label) => Sentiment::from_label(&label).unwrap_or_else(|| {
                warn!(raw = %label.trim(), "classifier returned a label outside the closed set");
                Sentiment::FALLBACK
            }),
            Err(err) => {
                warn!(error = %err, "sentiment classification failed, using fallback label");
                Sentiment::FALLBACK
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_all_three_labels() {
        let prompt = build_prompt("The lab computers are slow");
        assert!(prompt.contains("positive"));
        assert!(prompt.contains("negative"));
        assert!(prompt.contains("neutral"));
        assert!(prompt.contains("The lab computers are slow"));
    }

    #[test]
    fn test_prompt_quotes_feedback() {
        let prompt = build_prompt("great course");
        assert!(prompt.ends_with("\"great course\""));
    }
}

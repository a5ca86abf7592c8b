//! Sentiment label set for classified feedback.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Sentiment assigned to a feedback entry by the classifier.
///
/// The label set is closed: every persisted entry carries exactly one of
/// these values, lowercase on the wire. Classification failures resolve to
/// [`Sentiment::FALLBACK`] rather than surfacing an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Label used when classification fails or returns an unrecognized value.
    pub const FALLBACK: Self = Self::Neutral;

    /// Parse a normalized (trimmed, case-folded) label.
    ///
    /// Returns `None` for anything outside the closed label set; callers
    /// decide whether that means an error or the fallback label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    /// The wire representation of this label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_accepts_closed_set() {
        assert_eq!(Sentiment::from_label("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label("negative"), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("neutral"), Some(Sentiment::Neutral));
    }

    #[test]
    fn test_from_label_normalizes() {
        assert_eq!(
            Sentiment::from_label("  Positive \n"),
            Some(Sentiment::Positive)
        );
        assert_eq!(Sentiment::from_label("NEGATIVE"), Some(Sentiment::Negative));
    }

    #[test]
    fn test_from_label_rejects_everything_else() {
        assert_eq!(Sentiment::from_label(""), None);
        assert_eq!(Sentiment::from_label("mostly positive"), None);
        assert_eq!(Sentiment::from_label("unknown"), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");

        let parsed: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(parsed, Sentiment::Neutral);
    }

    #[test]
    fn test_fallback_is_neutral() {
        assert_eq!(Sentiment::FALLBACK, Sentiment::Neutral);
    }
}

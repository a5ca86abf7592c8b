//! Feedback analytics aggregation for the administrator dashboard.
//!
//! A single synchronous pass over the fetched corpus, recomputed on every
//! request. Keyword extraction is restricted to negative entries and works
//! by substring membership against a fixed vocabulary; the per-faculty
//! sentiment breakdown covers all entries.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use campus_voice_core::Sentiment;

use crate::models::FeedbackEntry;

/// Ranked lists are truncated to this many entries.
const TOP_LIMIT: usize = 10;

/// Closed vocabulary of facility and teaching-quality issue terms.
///
/// Matching is lowercase substring containment, not tokenization, so
/// multi-word terms like "not working" match too.
const ISSUE_KEYWORDS: &[&str] = &[
    "teaching", "explanation", "clarity", "understanding",
    "behavior", "rude", "attitude", "late", "absent",
    "marks", "grading", "unfair", "bias", "partial",
    "syllabus", "incomplete", "slow", "fast", "pace",
    "practical", "theory", "notes", "material", "book",
    "exam", "test", "assignment", "homework", "project",
    "time", "schedule", "punctual", "delay",
    "doubt", "question", "help", "support", "guidance",
    "interactive", "boring", "monotonous", "interesting",
    "communication", "english", "language", "accent",
    "pc", "computer", "laptop", "system", "lab", "projector",
    "ac", "fan", "light", "bench", "chair", "board", "marker",
    "wifi", "internet", "network", "not working", "broken", "damaged",
];

/// A keyword and how many negative entries mentioned it.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// A `keyword - faculty` pairing and its count.
#[derive(Debug, Clone, Serialize)]
pub struct IssueCount {
    pub issue: String,
    pub count: u64,
}

/// A `subject - faculty` pairing and its count.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: u64,
}

/// Per-faculty sentiment breakdown.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FacultySentiment {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub total: u64,
}

/// The analytics payload for the admin dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub top_keywords: Vec<KeywordCount>,
    pub top_faculty_issues: Vec<IssueCount>,
    pub top_subject_issues: Vec<SubjectCount>,
    pub faculty_stats: BTreeMap<String, FacultySentiment>,
}

/// Corpus-wide sentiment totals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeedbackStats {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

/// Counter keyed by string with stable first-encountered ordering.
///
/// Ranking sorts by descending count with a stable sort, so ties keep the
/// order in which keys were first seen.
#[derive(Default)]
struct CountTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl CountTable {
    fn bump(&mut self, key: &str) {
        if let Some(&i) = self.index.get(key) {
            if let Some(entry) = self.entries.get_mut(i) {
                entry.1 += 1;
            }
        } else {
            self.index.insert(key.to_owned(), self.entries.len());
            self.entries.push((key.to_owned(), 1));
        }
    }

    fn into_top(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(TOP_LIMIT);
        entries
    }
}

/// Aggregate the full feedback corpus into the dashboard report.
///
/// An empty corpus yields empty collections, not an error.
#[must_use]
pub fn aggregate(entries: &[FeedbackEntry]) -> AnalyticsReport {
    let mut keywords = CountTable::default();
    let mut faculty_issues = CountTable::default();
    let mut subject_issues = CountTable::default();
    let mut faculty_stats: BTreeMap<String, FacultySentiment> = BTreeMap::new();

    for entry in entries {
        if entry.sentiment == Sentiment::Negative {
            let text = entry.feedback_text.to_lowercase();
            for keyword in ISSUE_KEYWORDS {
                if text.contains(keyword) {
                    keywords.bump(keyword);
                    faculty_issues.bump(&format!("{keyword} - {}", entry.faculty_name));
                }
            }
            subject_issues.bump(&format!("{} - {}", entry.subject, entry.faculty_name));
        }

        let stats = faculty_stats.entry(entry.faculty_name.clone()).or_default();
        match entry.sentiment {
            Sentiment::Positive => stats.positive += 1,
            Sentiment::Negative => stats.negative += 1,
            Sentiment::Neutral => stats.neutral += 1,
        }
        stats.total += 1;
    }

    AnalyticsReport {
        top_keywords: keywords
            .into_top()
            .into_iter()
            .map(|(keyword, count)| KeywordCount { keyword, count })
            .collect(),
        top_faculty_issues: faculty_issues
            .into_top()
            .into_iter()
            .map(|(issue, count)| IssueCount { issue, count })
            .collect(),
        top_subject_issues: subject_issues
            .into_top()
            .into_iter()
            .map(|(subject, count)| SubjectCount { subject, count })
            .collect(),
        faculty_stats,
    }
}

/// Tally corpus-wide sentiment totals.
#[must_use]
pub fn sentiment_stats(sentiments: &[Sentiment]) -> FeedbackStats {
    let mut stats = FeedbackStats {
        total: sentiments.len() as u64,
        positive: 0,
        negative: 0,
        neutral: 0,
    };

    for sentiment in sentiments {
        match sentiment {
            Sentiment::Positive => stats.positive += 1,
            Sentiment::Negative => stats.negative += 1,
            Sentiment::Neutral => stats.neutral += 1,
        }
    }

    stats
}

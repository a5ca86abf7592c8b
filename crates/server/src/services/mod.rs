//! Application services: reconciliation, classification, analytics.

pub mod analytics;
pub mod reconcile;
pub mod sentiment;

pub use sentiment::SentimentClassifier;

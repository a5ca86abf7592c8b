//! Gemini API client for text classification.

mod client;
mod error;
mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{GenerateContentRequest, GenerateContentResponse};

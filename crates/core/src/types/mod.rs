//! Core types for Campus Voice.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod sentiment;

pub use email::{Email, EmailError};
pub use id::*;
pub use sentiment::Sentiment;

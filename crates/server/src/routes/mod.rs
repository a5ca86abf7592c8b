//! HTTP route handlers for the feedback portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness check
//!
//! # Auth
//! POST /api/auth/signup           - Create auth identity + profile record
//! POST /api/auth/login            - Authenticate, reconcile, establish session
//! POST /api/auth/logout           - Destroy session
//! GET  /api/auth/status           - Session status
//!
//! # Feedback
//! POST /api/feedback/submit      - Classify and persist feedback (session)
//! GET  /api/feedback/all         - Full corpus, newest first (admin)
//! GET  /api/feedback/stats       - Sentiment totals (admin)
//! GET  /api/feedback/my-feedback - Caller's own entries (session)
//! GET  /api/feedback/analytics   - Keyword/faculty/subject analytics (admin)
//! ```

pub mod auth;
pub mod feedback;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/status", get(auth::status))
}

/// Create the feedback routes router.
pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/submit", post(feedback::submit))
        .route("/all", get(feedback::all))
        .route("/stats", get(feedback::stats))
        .route("/my-feedback", get(feedback::my_feedback))
        .route("/analytics", get(feedback::analytics))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/feedback", feedback_routes())
}

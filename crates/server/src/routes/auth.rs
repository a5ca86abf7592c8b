//! Authentication route handlers.
//!
//! Sign-up and login delegate credential checks to the external auth
//! service; login additionally reconciles the profile record (guaranteeing
//! the reserved administrator account its flag and canonical name) before a
//! session is established.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use campus_voice_core::{Email, UserId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::reconcile::{self, UserDirectory};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Sign-up request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a signed-in user; never carries the access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&CurrentUser> for UserView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            is_admin: user.is_admin,
        }
    }
}

/// Sign-up response body.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user: SignupUserView,
}

/// The slice of the new identity echoed back after sign-up.
#[derive(Debug, Serialize)]
pub struct SignupUserView {
    pub email: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserView,
}

/// Message-only response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Session status response body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an auth identity and its profile record.
///
/// POST /api/auth/signup
///
/// No session is established; the user logs in separately (and may first
/// need to confirm their email, depending on project settings).
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    let name = non_empty(req.name)
        .ok_or_else(|| AppError::Validation("Name, email, and password are required".into()))?;
    let email = non_empty(req.email)
        .ok_or_else(|| AppError::Validation("Name, email, and password are required".into()))?;
    let password = non_empty(req.password)
        .ok_or_else(|| AppError::Validation("Name, email, and password are required".into()))?;

    let email = Email::parse(&email).map_err(|e| AppError::Validation(e.to_string()))?;

    let identity = state
        .auth()
        .sign_up(email.as_str(), &password, &name)
        .await
        .map_err(AppError::Auth)?;

    // Create the profile record up front so the first login finds it.
    // A duplicate row (repeat signup) is not an error worth failing for;
    // login reconciliation resolves whichever row exists.
    let profile = reconcile::default_profile(&UserId::new(identity.id), &email);
    let profile = if profile.is_admin {
        profile
    } else {
        crate::models::UserProfile { name, ..profile }
    };

    if let Err(err) = state.users().create(&profile).await {
        warn!(error = %err, "signup profile insert failed, deferring to login reconciliation");
    }

    info!(email = %email, "signup accepted");

    Ok(Json(SignupResponse {
        message: "Account created successfully! Please login.".to_string(),
        user: SignupUserView {
            email: identity.email,
        },
    }))
}

/// Authenticate, reconcile the profile record, and establish a session.
///
/// POST /api/auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = non_empty(req.email)
        .ok_or_else(|| AppError::Validation("Email and password are required".into()))?;
    let password = non_empty(req.password)
        .ok_or_else(|| AppError::Validation("Email and password are required".into()))?;

    let auth_session = state
        .auth()
        .sign_in_with_password(&email, &password)
        .await
        .map_err(AppError::Auth)?;

    let id = UserId::new(auth_session.user.id.clone());
    let email = Email::parse(&auth_session.user.email)
        .map_err(|e| AppError::Internal(format!("auth service returned invalid email: {e}")))?;

    let profile = reconcile::resolve_profile(state.users(), &id, &email).await?;

    let current_user = CurrentUser {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        is_admin: profile.is_admin,
        access_token: auth_session.access_token,
    };

    set_current_user(&session, &current_user).await?;

    info!(user = %current_user.id, admin = current_user.is_admin, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserView::from(&current_user),
    }))
}

/// Destroy the session.
///
/// POST /api/auth/logout
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_user(&session).await?;
    session.flush().await?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Report whether the caller has a session.
///
/// GET /api/auth/status
pub async fn status(OptionalUser(user): OptionalUser) -> Json<StatusResponse> {
    Json(StatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserView::from),
    })
}

/// Trim a request field, treating blank as absent.
fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

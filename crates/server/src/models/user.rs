//! User profile domain type.
//!
//! The auth service owns identities; this is the portal's profile record in
//! the `users` table, kept in sync by login reconciliation.

use serde::{Deserialize, Serialize};

use campus_voice_core::{Email, UserId};

/// A portal user profile.
///
/// Matches the persisted `users(id, email, name, is_admin)` row. The id is
/// assigned by the auth service and immutable; `name` and `is_admin` may be
/// amended by reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Auth-service-assigned identifier.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Whether this user is the administrator.
    pub is_admin: bool,
}

//! Session-related types.
//!
//! Types stored in the session for authentication state.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use campus_voice_core::{Email, UserId};

/// Session-stored user snapshot.
///
/// Captures the reconciled profile plus the delegated access credential used
/// to authorize subsequent data-service calls as this user. The token only
/// ever serializes into the server-held session store; API responses use
/// dedicated view types that exclude it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Auth-service-assigned user id.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Resolved display name.
    pub name: String,
    /// Whether this user is the administrator.
    pub is_admin: bool,
    /// Delegated access credential for row-level-authorized data calls.
    #[serde(
        serialize_with = "expose_for_session",
        deserialize_with = "restore_from_session"
    )]
    pub access_token: SecretString,
}

/// Serialize a secret token into the session store.
///
/// `SecretString` deliberately does not implement `Serialize`; the session
/// snapshot is the one place the token must round-trip.
fn expose_for_session<S>(token: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(token.expose_secret())
}

/// Deserialize a secret token back out of the session store.
fn restore_from_session<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_session_snapshot_roundtrips_token() {
        let user = CurrentUser {
            id: UserId::new("u-1"),
            email: Email::parse("student@university.edu").unwrap(),
            name: "student".to_string(),
            is_admin: false,
            access_token: SecretString::from("delegated-token"),
        };

        let json = serde_json::to_string(&user).unwrap();
        let restored: CurrentUser = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, user.id);
        assert_eq!(restored.access_token.expose_secret(), "delegated-token");
    }
}

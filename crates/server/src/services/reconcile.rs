//! Login-time user reconciliation.
//!
//! After the auth service accepts a login, the portal guarantees that a
//! matching profile row exists in the `users` table and that the reserved
//! administrator address always carries the admin flag and canonical name.
//! A login must not establish a session unless this resolves.

use tracing::warn;

use campus_voice_core::{Email, UserId};

use crate::models::UserProfile;
use crate::supabase::SupabaseError;

/// The single email address that always receives administrator privileges.
pub const RESERVED_ADMIN_EMAIL: &str = "yashpatil@admin.com";

/// Canonical display name for the administrator account.
pub const ADMIN_DISPLAY_NAME: &str = "Yash Patil (Admin)";

/// Directory of user profile records.
///
/// Implemented by the elevated Supabase store; tests implement it in memory.
pub trait UserDirectory {
    /// Look a profile up by its auth-service id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, SupabaseError>;

    /// Look a profile up by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserProfile>, SupabaseError>;

    /// Create a profile row, returning the stored record.
    async fn create(&self, profile: &UserProfile) -> Result<UserProfile, SupabaseError>;

    /// Force the admin flag and canonical name on an existing row.
    async fn mark_admin(&self, id: &UserId, name: &str) -> Result<(), SupabaseError>;
}

/// Errors from profile reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Lookup, creation, and the retry all failed to produce a record.
    #[error("could not create or find user record")]
    Unresolvable,

    /// The data service failed outright.
    #[error(transparent)]
    Store(#[from] SupabaseError),
}

/// The profile a fresh identity gets on first login.
///
/// Display name defaults to the email's local part; the reserved
/// administrator address gets the canonical name and the admin flag.
#[must_use]
pub fn default_profile(id: &UserId, email: &Email) -> UserProfile {
    if email.as_str() == RESERVED_ADMIN_EMAIL {
        UserProfile {
            id: id.clone(),
            email: email.clone(),
            name: ADMIN_DISPLAY_NAME.to_owned(),
            is_admin: true,
        }
    } else {
        UserProfile {
            id: id.clone(),
            email: email.clone(),
            name: email.local_part().to_owned(),
            is_admin: false,
        }
    }
}

/// Resolve the profile record for an authenticated identity.
///
/// Lookup order is id first, then email; the id index can lag the email
/// index across the store's eventual-consistency window. A failed create is
/// retried once as an email lookup, since a concurrent login may have
/// created the row. Regardless of the path taken, a resolved record for the
/// reserved administrator address that lacks the admin flag is repaired.
///
/// # Errors
///
/// Returns `ReconcileError::Unresolvable` when no record can be produced;
/// the caller must not establish a session. Store failures propagate as
/// `ReconcileError::Store`.
pub async fn resolve_profile<D: UserDirectory>(
    directory: &D,
    id: &UserId,
    email: &Email,
) -> Result<UserProfile, ReconcileError> {
    let existing = match directory.find_by_id(id).await? {
        Some(profile) => Some(profile),
        None => directory.find_by_email(email).await?,
    };

    let mut profile = match existing {
        Some(profile) => profile,
        None => match directory.create(&default_profile(id, email)).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, "profile create failed, retrying lookup by email");
                directory
                    .find_by_email(email)
                    .await?
                    .ok_or(ReconcileError::Unresolvable)?
            }
        },
    };

    // Self-heal records created before the reserved address was designated
    // administrator.
    if profile.email.as_str() == RESERVED_ADMIN_EMAIL && !profile.is_admin {
        directory.mark_admin(&profile.id, ADMIN_DISPLAY_NAME).await?;
        profile.is_admin = true;
        profile.name = ADMIN_DISPLAY_NAME.to_owned();
    }

    Ok(profile)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// In-memory directory double with failure injection.
    #[derive(Default)]
    struct FakeDirectory {
        rows: Mutex<Vec<UserProfile>>,
        reject_creates: bool,
        /// Row that "appears" when a create is rejected, simulating the
        /// concurrent login that won the insert race.
        racing_row: Mutex<Option<UserProfile>>,
    }

    impl FakeDirectory {
        fn seeded(profile: UserProfile) -> Self {
            Self {
                rows: Mutex::new(vec![profile]),
                ..Self::default()
            }
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    impl UserDirectory for FakeDirectory {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, SupabaseError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.id == id)
                .cloned())
        }

        async fn find_by_email(
            &self,
            email: &Email,
        ) -> Result<Option<UserProfile>, SupabaseError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|p| &p.email == email)
                .cloned())
        }

        async fn create(&self, profile: &UserProfile) -> Result<UserProfile, SupabaseError> {
            if self.reject_creates {
                if let Some(row) = self.racing_row.lock().unwrap().take() {
                    self.rows.lock().unwrap().push(row);
                }
                return Err(SupabaseError::Api {
                    status: 409,
                    message: "duplicate key value violates unique constraint".to_owned(),
                });
            }
            self.rows.lock().unwrap().push(profile.clone());
            Ok(profile.clone())
        }

        async fn mark_admin(&self, id: &UserId, name: &str) -> Result<(), SupabaseError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|p| &p.id == id).unwrap();
            row.is_admin = true;
            row.name = name.to_owned();
            Ok(())
        }
    }

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_creates_profile_with_local_part_name() {
        let directory = FakeDirectory::default();
        let profile = resolve_profile(&directory, &UserId::new("u-1"), &email("jdoe@university.edu"))
            .await
            .unwrap();

        assert_eq!(profile.name, "jdoe");
        assert!(!profile.is_admin);
        assert_eq!(directory.row_count(), 1);
    }

    #[tokio::test]
    async fn test_reserved_admin_first_login() {
        let directory = FakeDirectory::default();
        let profile = resolve_profile(&directory, &UserId::new("u-a"), &email(RESERVED_ADMIN_EMAIL))
            .await
            .unwrap();

        assert!(profile.is_admin);
        assert_eq!(profile.name, ADMIN_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_resolves_existing_record_by_id() {
        let existing = UserProfile {
            id: UserId::new("u-2"),
            email: email("kim@university.edu"),
            name: "Kim".to_owned(),
            is_admin: false,
        };
        let directory = FakeDirectory::seeded(existing);

        let profile = resolve_profile(&directory, &UserId::new("u-2"), &email("kim@university.edu"))
            .await
            .unwrap();

        assert_eq!(profile.name, "Kim");
        assert_eq!(directory.row_count(), 1);
    }

    #[tokio::test]
    async fn test_create_race_falls_back_to_email_lookup() {
        let winner = UserProfile {
            id: UserId::new("u-3"),
            email: email("lee@university.edu"),
            name: "lee".to_owned(),
            is_admin: false,
        };
        let directory = FakeDirectory {
            reject_creates: true,
            racing_row: Mutex::new(Some(winner)),
            ..FakeDirectory::default()
        };

        let profile = resolve_profile(&directory, &UserId::new("u-3"), &email("lee@university.edu"))
            .await
            .unwrap();

        assert_eq!(profile.id, UserId::new("u-3"));
        assert_eq!(directory.row_count(), 1);
    }

    #[tokio::test]
    async fn test_self_heals_demoted_admin_record() {
        let stale = UserProfile {
            id: UserId::new("u-a"),
            email: email(RESERVED_ADMIN_EMAIL),
            name: "whatever they typed at signup".to_owned(),
            is_admin: false,
        };
        let directory = FakeDirectory::seeded(stale);

        let profile = resolve_profile(&directory, &UserId::new("u-a"), &email(RESERVED_ADMIN_EMAIL))
            .await
            .unwrap();

        assert!(profile.is_admin);
        assert_eq!(profile.name, ADMIN_DISPLAY_NAME);

        // The stored row was repaired, not just the returned copy.
        let stored = directory
            .find_by_id(&UserId::new("u-a"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_admin);
        assert_eq!(stored.name, ADMIN_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let directory = FakeDirectory::default();
        let id = UserId::new("u-4");
        let addr = email("sam@university.edu");

        let first = resolve_profile(&directory, &id, &addr).await.unwrap();
        let second = resolve_profile(&directory, &id, &addr).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.name, second.name);
        assert_eq!(directory.row_count(), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_when_create_and_retry_fail() {
        let directory = FakeDirectory {
            reject_creates: true,
            ..FakeDirectory::default()
        };

        let result =
            resolve_profile(&directory, &UserId::new("u-5"), &email("gone@university.edu")).await;

        assert!(matches!(result, Err(ReconcileError::Unresolvable)));
    }
}

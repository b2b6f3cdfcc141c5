//! Per-user profile loading and editing.

use taskflow_core::task::{Profile, UserId};

use crate::connectors::backend::{IdentityProvider, ProfileStore, StoreError};
use crate::notify::{Notice, Notifier};

/// Error type for profile operations.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches and edits the profile record belonging to the current identity.
pub struct ProfileService<P, I, N> {
    store: P,
    identity: I,
    notifier: N,
    profile: Option<Profile>,
}

impl<P: ProfileStore, I: IdentityProvider, N: Notifier> ProfileService<P, I, N> {
    pub fn new(store: P, identity: I, notifier: N) -> Self {
        Self {
            store,
            identity,
            notifier,
            profile: None,
        }
    }

    /// Returns the loaded profile, if any.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Loads the current identity's profile, creating an empty one on first
    /// visit when none exists yet.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> Result<&Profile, ProfileError> {
        let user = self.current_user()?;
        let result = match self.store.fetch_profile(&user).await {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => {
                tracing::info!("No profile for {}; creating one", user);
                self.store.insert_profile(&user, None, None).await
            }
            Err(error) => Err(error),
        };
        match result {
            Ok(profile) => Ok(self.profile.insert(profile)),
            Err(error) => {
                self.notifier
                    .notify(Notice::error("Error fetching profile", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Upserts the supplied fields of the current identity's profile.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &mut self,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<&Profile, ProfileError> {
        let user = self.current_user()?;
        match self.store.upsert_profile(&user, full_name, avatar_url).await {
            Ok(profile) => {
                self.notifier.notify(Notice::info(
                    "Profile updated",
                    "Your profile has been updated successfully.",
                ));
                Ok(self.profile.insert(profile))
            }
            Err(error) => {
                self.notifier
                    .notify(Notice::error("Error updating profile", error.to_string()));
                Err(error.into())
            }
        }
    }

    fn current_user(&self) -> Result<UserId, ProfileError> {
        self.identity
            .current_user()
            .ok_or(ProfileError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::backend::{MockIdentityProvider, MockProfileStore};
    use crate::notify::MockNotifier;
    use chrono::Utc;
    use mockall::predicate::*;

    fn signed_in() -> MockIdentityProvider {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_current_user()
            .returning(|| Some("user-1".to_string()));
        identity
    }

    fn stored_profile(full_name: Option<&str>) -> Profile {
        let now = Utc::now();
        Profile {
            id: "user-1".to_string(),
            full_name: full_name.map(str::to_string),
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn load_returns_the_existing_profile() {
        let mut store = MockProfileStore::new();
        store
            .expect_fetch_profile()
            .with(eq("user-1".to_string()))
            .times(1)
            .returning(|_| Ok(Some(stored_profile(Some("Ada")))));
        store.expect_insert_profile().never();

        let mut service = ProfileService::new(store, signed_in(), MockNotifier::new());
        let profile = service.load().await.unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn load_auto_creates_a_profile_on_first_visit() {
        let mut store = MockProfileStore::new();
        store
            .expect_fetch_profile()
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_insert_profile()
            .with(
                eq("user-1".to_string()),
                eq(None::<String>),
                eq(None::<String>),
            )
            .times(1)
            .returning(|_, _, _| Ok(stored_profile(None)));

        let mut service = ProfileService::new(store, signed_in(), MockNotifier::new());
        let profile = service.load().await.unwrap();

        assert_eq!(profile.full_name, None);
        assert!(service.profile().is_some());
    }

    #[tokio::test]
    async fn load_without_identity_fails_immediately() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_current_user().returning(|| None);
        let mut store = MockProfileStore::new();
        store.expect_fetch_profile().never();

        let mut service = ProfileService::new(store, identity, MockNotifier::new());
        let result = service.load().await;

        assert!(matches!(result, Err(ProfileError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn update_upserts_only_the_supplied_fields() {
        let mut store = MockProfileStore::new();
        store
            .expect_upsert_profile()
            .with(
                eq("user-1".to_string()),
                eq(Some("Ada".to_string())),
                eq(None::<String>),
            )
            .times(1)
            .returning(|_, full_name, _| Ok(stored_profile(full_name.as_deref())));

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(1).returning(|_| ());

        let mut service = ProfileService::new(store, signed_in(), notifier);
        let profile = service.update(Some("Ada".to_string()), None).await.unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
    }
}

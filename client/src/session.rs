//! Application-root-scoped session state.
//!
//! Authentication happens in the external identity service; this module only
//! holds the resulting identity between the sign-in and sign-out boundaries
//! and hands it to every store-scoped operation.

use std::sync::{Arc, RwLock};

use taskflow_core::task::UserId;

use crate::connectors::backend::IdentityProvider;

/// Represents the currently signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

impl CurrentUser {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into() }
    }
}

/// Shared session handle. Cloning is cheap; all clones observe the same
/// sign-in state.
#[derive(Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<CurrentUser>>>,
}

impl Session {
    /// Creates a signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the session for `user_id`; the sign-in boundary.
    #[tracing::instrument(skip(self))]
    pub fn sign_in(&self, user_id: impl Into<UserId> + std::fmt::Debug) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(CurrentUser::new(user_id));
        }
    }

    /// Tears the session down; the sign-out boundary.
    #[tracing::instrument(skip(self))]
    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user().is_some()
    }
}

impl IdentityProvider for Session {
    fn current_user(&self) -> Option<UserId> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|user| user.id.clone()))
    }
}

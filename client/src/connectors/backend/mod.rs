//! Backend connectivity for the task and profile stores.
//!
//! This module provides abstractions for the hosted relational store and the
//! identity collaborator, including:
//! - Error types for store operations
//! - Traits defining the store contract, scoped per authenticated user
//! - A trait supplying the current identity
//!
//! The module is implementation-agnostic; a concrete implementation speaking
//! the hosted backend's REST dialect is provided in the `rest` submodule.
//! Visibility and mutation rights are enforced by the backend's row-level
//! access policies, not here.

use mockall::automock;
use taskflow_core::task::{Profile, Task, TaskDraft, TaskId, TaskPatch, UserId};
use thiserror::Error;

pub mod rest;

/// Errors that can occur while talking to the external store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never produced a usable response.
    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend refused the request (access policy, constraint, bad input).
    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// No record with the given id exists remotely.
    #[error("Record '{0}' not found")]
    NotFound(String),
    /// The backend answered with a payload we could not decode.
    #[error("Malformed backend payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Contract with the external task store.
///
/// Every operation is an independent request-response round trip; the store
/// generates ids and timestamps and scopes visibility to the owning user.
#[automock]
pub trait TaskStore {
    /// Reads all tasks owned by `user_id`, ordered by creation time
    /// descending.
    async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError>;

    /// Inserts one pending task with progress 0 for `user_id` and returns the
    /// stored record, including the generated id and timestamps.
    async fn insert_task(&self, user_id: &UserId, draft: &TaskDraft) -> Result<Task, StoreError>;

    /// Updates only the fields carried by `patch` and returns the updated
    /// record.
    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, StoreError>;

    /// Deletes one task by id; an absent id is reported as
    /// [`StoreError::NotFound`].
    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError>;
}

/// Contract with the external profile store (one record per user id).
#[automock]
pub trait ProfileStore {
    /// Reads the profile for `id`, or `None` when it does not exist yet.
    async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Inserts a new profile record for `id`.
    async fn insert_profile(
        &self,
        id: &UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Profile, StoreError>;

    /// Inserts or updates the named fields of the profile for `id`.
    async fn upsert_profile(
        &self,
        id: &UserId,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<Profile, StoreError>;
}

/// Supplies the identity every store operation is scoped to. Authentication
/// itself is handled entirely by the external identity service.
#[automock]
pub trait IdentityProvider {
    /// Returns the current user id, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<UserId>;
}

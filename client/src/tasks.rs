//! The task list controller: in-memory collection plus the mutations that
//! call through to the external store.
//!
//! Local state is only mutated once the store confirms a write, so the
//! in-memory list never diverges from a successful write. It may lag behind
//! writes from other sessions; no reconciliation is attempted.

use taskflow_core::task::{Task, TaskDraft, TaskId, TaskPatch, UserId};

use crate::connectors::backend::{IdentityProvider, StoreError, TaskStore};
use crate::notify::{Notice, Notifier};

/// Error type for task list operations.
#[derive(Debug, thiserror::Error)]
pub enum TasksError {
    /// The draft title was empty or whitespace; rejected before any store
    /// call.
    #[error("Title cannot be empty")]
    EmptyTitle,
    /// No identity is signed in; mutating operations fail immediately.
    #[error("Not authenticated")]
    NotAuthenticated,
    /// The store reported a failure; local state was left untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Holds the current task collection (newest first) and applies each
/// store-confirmed mutation to it.
pub struct TaskListController<S, I, N> {
    store: S,
    identity: I,
    notifier: N,
    tasks: Vec<Task>,
}

impl<S: TaskStore, I: IdentityProvider, N: Notifier> TaskListController<S, I, N> {
    pub fn new(store: S, identity: I, notifier: N) -> Self {
        Self {
            store,
            identity,
            notifier,
            tasks: Vec::new(),
        }
    }

    /// Returns the current in-memory snapshot, ordered newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replaces the whole collection with the store's current contents.
    #[tracing::instrument(skip(self))]
    pub async fn reload(&mut self) -> Result<(), TasksError> {
        let user = self.current_user()?;
        match self.store.list_tasks(&user).await {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "Task list reloaded");
                self.tasks = tasks;
                Ok(())
            }
            Err(error) => {
                self.notifier
                    .notify(Notice::error("Error fetching tasks", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Persists a new pending task with progress 0 and prepends the stored
    /// record on success. Blank titles are rejected before any store call.
    #[tracing::instrument(skip(self))]
    pub async fn create(&mut self, draft: TaskDraft) -> Result<Task, TasksError> {
        if draft.title.trim().is_empty() {
            return Err(TasksError::EmptyTitle);
        }
        let user = self.current_user()?;
        match self.store.insert_task(&user, &draft).await {
            Ok(task) => {
                self.tasks.insert(0, task.clone());
                self.notifier.notify(Notice::info(
                    "Task created",
                    "Your task has been created successfully.",
                ));
                Ok(task)
            }
            Err(error) => {
                tracing::error!("Failed to create task: {}", error);
                self.notifier
                    .notify(Notice::error("Error creating task", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Persists only the fields carried by `patch` and replaces the matching
    /// record on success. Failure leaves local state untouched.
    #[tracing::instrument(skip(self))]
    pub async fn update(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task, TasksError> {
        let _user = self.current_user()?;
        match self.store.update_task(id, &patch).await {
            Ok(updated) => {
                if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == *id) {
                    *slot = updated.clone();
                }
                self.notifier.notify(Notice::info(
                    "Task updated",
                    "Your task has been updated successfully.",
                ));
                Ok(updated)
            }
            Err(error) => {
                tracing::error!("Failed to update task {}: {}", id, error);
                self.notifier
                    .notify(Notice::error("Error updating task", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Deletes by id remotely, then locally. An id absent remotely surfaces
    /// the store's not-found error.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&mut self, id: &TaskId) -> Result<(), TasksError> {
        let _user = self.current_user()?;
        match self.store.delete_task(id).await {
            Ok(()) => {
                self.tasks.retain(|task| task.id != *id);
                self.notifier.notify(Notice::info(
                    "Task deleted",
                    "Your task has been deleted successfully.",
                ));
                Ok(())
            }
            Err(error) => {
                tracing::error!("Failed to delete task {}: {}", id, error);
                self.notifier
                    .notify(Notice::error("Error deleting task", error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Flips pending/completed via [`update`](Self::update), applying the
    /// toggle transition rule. Returns `Ok(None)` without touching the store
    /// when the id is not in the local collection.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_status(&mut self, id: &TaskId) -> Result<Option<Task>, TasksError> {
        let Some(task) = self.tasks.iter().find(|task| task.id == *id) else {
            return Ok(None);
        };
        let (status, progress) = task.toggle_transition();
        let patch = TaskPatch::new().status(status).progress(progress);
        self.update(id, patch).await.map(Some)
    }

    fn current_user(&self) -> Result<UserId, TasksError> {
        self.identity
            .current_user()
            .ok_or(TasksError::NotAuthenticated)
    }
}

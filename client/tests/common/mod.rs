//! Shared fixtures: an in-memory stand-in for the hosted task store and a
//! notifier that records what it is asked to show.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use taskflow_client::connectors::backend::{StoreError, TaskStore};
use taskflow_client::notify::{Notice, Notifier};
use taskflow_core::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus, UserId};

/// In-memory task store. Clones share the same backing data, so a test can
/// keep a handle while the controller owns another.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<Mutex<Vec<Task>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.lock().unwrap();
        // Inserts append, so newest-first is reverse insertion order.
        Ok(tasks
            .iter()
            .rev()
            .filter(|task| task.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn insert_task(&self, user_id: &UserId, draft: &TaskDraft) -> Result<Task, StoreError> {
        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let task = Task {
            id: format!("task-{id}"),
            user_id: user_id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: TaskStatus::Pending,
            priority: draft.priority,
            due_date: draft.due_date,
            category: draft.category.clone(),
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|task| task.id == *id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(category) = &patch.category {
            task.category = category.clone();
        }
        if let Some(progress) = patch.progress {
            task.progress = progress;
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|task| task.id != *id);
        if tasks.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

/// Notifier that records every notice for later assertions. Clones share the
/// same log.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

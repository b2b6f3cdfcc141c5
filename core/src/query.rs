//! Pure filtering and sorting over in-memory task lists.
//!
//! A [`TaskQuery`] combines a free-text search with status, priority, and
//! category predicates (logical AND) and a stable sort over the filtered
//! result. Applying the default query returns the input unchanged apart
//! from ordering.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::task::{Task, TaskPriority, TaskStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PriorityFilter {
    #[default]
    All,
    Only(TaskPriority),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

/// Sort keys applied to the filtered set. All sorts are stable, so ties keep
/// their relative order from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortKey {
    CreatedAsc,
    #[default]
    CreatedDesc,
    /// Due date ascending; tasks without a due date sort last.
    DueDate,
    /// Priority descending, urgent first.
    Priority,
    /// Progress descending.
    Progress,
}

/// Filter and sort criteria for the task list.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskQuery {
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl TaskQuery {
    /// Whether the task passes all four predicates.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.matches_status(task.status)
            && self.matches_priority(task.priority)
            && self.matches_category(task.category.as_deref())
    }

    /// Filters and sorts a snapshot of the task list.
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut filtered: Vec<Task> = tasks
            .iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();

        match self.sort {
            SortKey::CreatedAsc => filtered.sort_by_key(|task| task.created_at),
            SortKey::CreatedDesc => filtered.sort_by_key(|task| Reverse(task.created_at)),
            SortKey::DueDate => {
                filtered.sort_by_key(|task| (task.due_date.is_none(), task.due_date))
            }
            SortKey::Priority => filtered.sort_by_key(|task| Reverse(task.priority.rank())),
            SortKey::Progress => filtered.sort_by_key(|task| Reverse(task.progress)),
        }

        filtered
    }

    /// Case-insensitive substring match against title, description, or
    /// category; any one match qualifies. An empty search matches everything.
    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
            || task
                .category
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
    }

    fn matches_status(&self, status: TaskStatus) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TaskStatus::Pending,
            StatusFilter::Completed => status == TaskStatus::Completed,
        }
    }

    fn matches_priority(&self, priority: TaskPriority) -> bool {
        match self.priority {
            PriorityFilter::All => true,
            PriorityFilter::Only(wanted) => priority == wanted,
        }
    }

    fn matches_category(&self, category: Option<&str>) -> bool {
        match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => category == Some(wanted.as_str()),
        }
    }
}

/// Distinct categories across the given tasks, sorted, for populating the
/// category filter.
pub fn available_categories(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .filter_map(|task| task.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

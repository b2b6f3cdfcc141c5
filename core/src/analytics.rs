//! Pure aggregation over in-memory task lists for the analytics view.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::task::{Profile, Task, TaskPriority, TaskStatus, UserId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Labels for the progress histogram buckets, in bucket order.
pub const PROGRESS_BUCKET_LABELS: [&str; 5] = ["0-25%", "26-50%", "51-75%", "76-99%", "100%"];

/// Headline statistics across the whole task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// round(completed / total * 100); 0 when there are no tasks.
    pub completion_rate: u8,
    /// round(mean progress); 0 when there are no tasks.
    pub avg_progress: u8,
    /// Tasks with a due date strictly before `now` that are not completed.
    pub overdue: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        let pending = total - completed;

        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        let avg_progress = if total == 0 {
            0
        } else {
            let sum: u32 = tasks.iter().map(|task| u32::from(task.progress)).sum();
            (f64::from(sum) / total as f64).round() as u8
        };
        let overdue = tasks.iter().filter(|task| task.is_overdue(now)).count();

        Self {
            total,
            completed,
            pending,
            completion_rate,
            avg_progress,
            overdue,
        }
    }
}

/// Completed-task count for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub completed: usize,
}

/// Chart-ready groupings of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChartData {
    /// Count per status, pending first.
    pub by_status: Vec<(TaskStatus, usize)>,
    /// Count per priority, in ascending urgency order.
    pub by_priority: Vec<(TaskPriority, usize)>,
    /// Count per distinct category, in order of first appearance.
    pub by_category: Vec<(String, usize)>,
    /// Incomplete tasks bucketed by progress; see [`PROGRESS_BUCKET_LABELS`].
    pub progress_histogram: [usize; 5],
    /// Tasks whose status became completed on each of the trailing 7 calendar
    /// days, oldest first. Keyed on `updated_at`, which is an approximation:
    /// a completed task edited later moves to the edit's day.
    pub completion_trend: Vec<DailyCompletion>,
}

impl ChartData {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let by_status = [TaskStatus::Pending, TaskStatus::Completed]
            .into_iter()
            .map(|status| {
                let count = tasks.iter().filter(|task| task.status == status).count();
                (status, count)
            })
            .collect();

        let by_priority = TaskPriority::ALL
            .into_iter()
            .map(|priority| {
                let count = tasks.iter().filter(|task| task.priority == priority).count();
                (priority, count)
            })
            .collect();

        let mut by_category: Vec<(String, usize)> = Vec::new();
        for task in tasks {
            let Some(category) = &task.category else {
                continue;
            };
            match by_category.iter_mut().find(|(name, _)| name == category) {
                Some((_, count)) => *count += 1,
                None => by_category.push((category.clone(), 1)),
            }
        }

        let mut progress_histogram = [0usize; 5];
        for task in tasks {
            if task.status == TaskStatus::Completed {
                continue;
            }
            progress_histogram[progress_bucket(task.progress)] += 1;
        }

        let today = now.date_naive();
        let completion_trend = (0..7)
            .map(|offset| {
                let date = today - TimeDelta::days(6 - offset);
                let completed = tasks
                    .iter()
                    .filter(|task| {
                        task.status == TaskStatus::Completed
                            && task.updated_at.date_naive() == date
                    })
                    .count();
                DailyCompletion { date, completed }
            })
            .collect();

        Self {
            by_status,
            by_priority,
            by_category,
            progress_histogram,
            completion_trend,
        }
    }
}

/// Cross-user statistics for the admin overview. The caller fetches every
/// profile and every task; whether it may is decided by the backend's access
/// policies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdminStats {
    pub total_users: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// round(total tasks / total users); 0 when there are no users.
    pub avg_tasks_per_user: usize,
}

impl AdminStats {
    pub fn from_records(profiles: &[Profile], tasks: &[Task]) -> Self {
        let total_users = profiles.len();
        let total_tasks = tasks.len();
        let completed_tasks = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count();
        let pending_tasks = total_tasks - completed_tasks;
        let avg_tasks_per_user = if total_users == 0 {
            0
        } else {
            (total_tasks as f64 / total_users as f64).round() as usize
        };

        Self {
            total_users,
            total_tasks,
            completed_tasks,
            pending_tasks,
            avg_tasks_per_user,
        }
    }
}

/// Task statistics for one user, computed over a cross-user task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserTaskStats {
    pub total: usize,
    pub completed: usize,
    /// round(completed / total * 100); 0 when the user has no tasks.
    pub completion_rate: u8,
}

impl UserTaskStats {
    pub fn for_user(tasks: &[Task], user_id: &UserId) -> Self {
        let mut total = 0;
        let mut completed = 0;
        for task in tasks.iter().filter(|task| task.user_id == *user_id) {
            total += 1;
            if task.status == TaskStatus::Completed {
                completed += 1;
            }
        }
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };

        Self {
            total,
            completed,
            completion_rate,
        }
    }
}

fn progress_bucket(progress: u8) -> usize {
    match progress {
        0..=25 => 0,
        26..=50 => 1,
        51..=75 => 2,
        76..=99 => 3,
        _ => 4,
    }
}

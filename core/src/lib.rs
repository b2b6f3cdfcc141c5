//! Core domain models and task analytics for Taskflow.
pub mod analytics;
pub mod query;
pub mod task;

pub use analytics::{AdminStats, ChartData, DailyCompletion, TaskSummary, UserTaskStats};
pub use query::{CategoryFilter, PriorityFilter, SortKey, StatusFilter, TaskQuery};
pub use task::{Profile, Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};

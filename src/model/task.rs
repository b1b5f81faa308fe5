//! Task records and their enumerations.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, TaskId, UserId};

/// Task priority.
///
/// Priorities form a closed total order `Low < Medium < High < Blocker`; the
/// ordering is defined through [`TaskPriority::scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Default priority.
    Medium,
    /// Should be picked up soon.
    High,
    /// Blocks other work.
    Blocker,
}

impl TaskPriority {
    /// Scalar weight used for sorting.
    #[must_use]
    pub const fn scalar(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Blocker => 4,
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Ord for TaskPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.scalar().cmp(&other.scalar())
    }
}

impl PartialOrd for TaskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Blocker => write!(f, "blocker"),
        }
    }
}

/// Task workflow status. Statuses carry no order; they only take part in
/// set-membership filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A unit of work filed under exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identifier assigned at creation.
    pub id: TaskId,
    /// Unique title.
    pub title: String,
    /// Optional long-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// Creation timestamp supplied by the caller.
    pub creation: DateTime<Utc>,
    /// Optional deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    /// Free-form labels, deduplicated.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning project.
    pub project: ProjectId,
    /// Users working on the task.
    #[serde(default)]
    pub assignees: Vec<UserId>,
    /// Users who reported the task.
    #[serde(default)]
    pub reporters: Vec<UserId>,
    /// Tasks this task blocks.
    #[serde(default)]
    pub blocks: Vec<TaskId>,
    /// Tasks this task relates to.
    #[serde(default)]
    pub relates_to: Vec<TaskId>,
}

impl Task {
    /// Returns true if `user` is an assignee or a reporter of this task.
    #[must_use]
    pub fn involves(&self, user: &UserId) -> bool {
        self.assignees.contains(user) || self.reporters.contains(user)
    }
}

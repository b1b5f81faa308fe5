//! Sort keys for listing queries.

use serde::{Deserialize, Serialize};

/// Sort key for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UsersOrder {
    /// By display name.
    NameAlpha,
}

/// Sort key for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectsOrder {
    /// By name.
    NameAlpha,
    /// By number of distinct members (assignees and reporters of its tasks).
    NumMembers,
    /// By number of tasks filed under the project.
    NumTasks,
}

/// Sort key for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TasksOrder {
    /// By title.
    TitleAlpha,
    /// By priority scalar.
    Priority,
    /// By due date; undated tasks count as later than any dated task.
    DueTime,
    /// By creation timestamp.
    CreationTime,
}

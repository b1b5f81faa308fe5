//! Filter sets for listing queries.
//!
//! Every field is optional; `None` means "no constraint". A present but empty
//! id list is vacuously satisfied by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ProjectId, TaskStatus, UserId};

/// Filters for user listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersFilters {
    /// The user must be an assignee or reporter of at least one task in each
    /// of these projects.
    pub projects: Option<Vec<ProjectId>>,
}

/// Filters for project listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectsFilters {
    /// Created strictly after this instant (whole-second precision).
    pub created_after: Option<DateTime<Utc>>,
    /// Created strictly before this instant (whole-second precision).
    pub created_before: Option<DateTime<Utc>>,
    /// Every listed user must be a member (assignee or reporter of one of the
    /// project's tasks).
    pub members: Option<Vec<UserId>>,
    /// Every listed user must be an owner.
    pub owners: Option<Vec<UserId>>,
}

/// Filters for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TasksFilters {
    /// Created strictly after this instant (whole-second precision).
    pub created_after: Option<DateTime<Utc>>,
    /// Created strictly before this instant (whole-second precision).
    pub created_before: Option<DateTime<Utc>>,
    /// Every listed user must be an assignee.
    pub assignees: Option<Vec<UserId>>,
    /// Every listed user must be a reporter.
    pub reporters: Option<Vec<UserId>>,
    /// Every listed tag must be present.
    pub tags: Option<Vec<String>>,
    /// The task's status must be one of these.
    pub status: Option<Vec<TaskStatus>>,
    /// The task's project must be one of these.
    pub projects: Option<Vec<ProjectId>>,
}

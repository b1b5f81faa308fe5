//! Entity model: users, projects and tasks.
//!
//! Entities are plain records. Relationships are stored as typed id
//! references and resolved against the store on demand, so cycles
//! (manager/subordinate, blocks/relates-to) never become ownership cycles.

mod ids;
mod project;
mod task;
mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ids::{slugify, ProjectId, TaskId, UserId};
pub use project::Project;
pub use task::{Task, TaskPriority, TaskStatus};
pub use user::User;

pub(crate) use ids::allocate_id;

/// Kind of entity, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A [`User`].
    User,
    /// A [`Project`].
    Project,
    /// A [`Task`].
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Project => write!(f, "project"),
            Self::Task => write!(f, "task"),
        }
    }
}

//! Create/update paths for users, projects and tasks.
//!
//! Every mutation follows the same sequence: authorize the caller, check that
//! the target exists, validate field shapes, check uniqueness against other
//! entities, resolve every reference (rejecting self-references), deduplicate,
//! and only then commit. Any failure before the commit leaves the state
//! exactly as it was.

mod project;
mod task;
mod user;
mod validate;

pub use project::{NewProject, ProjectUpdate};
pub use task::{NewTask, TaskUpdate};
pub use user::{NewUser, UserUpdate};

pub(crate) use project::{create_project, update_project};
pub(crate) use task::{create_task, update_task};
pub(crate) use user::{create_user, update_user};

use crate::collections::append_unique;
use crate::error::{StoreError, StoreResult};
use crate::model::{EntityKind, TaskId, UserId};
use crate::storage::state::StoreState;

/// Resolves user references named in `field`, keeping the first occurrence of
/// each id. `this` is the user being written, if any; naming it fails.
fn resolve_users(
    state: &StoreState,
    field: &str,
    ids: &[UserId],
    this: Option<&UserId>,
) -> StoreResult<Vec<UserId>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if this == Some(id) {
            return Err(StoreError::invalid_reference(
                field,
                id.as_str(),
                "user references itself",
            ));
        }
        if state.user(id).is_none() {
            return Err(StoreError::not_found(EntityKind::User, field, id.as_str()));
        }
        append_unique(&mut out, id.clone());
    }
    Ok(out)
}

/// Task counterpart of [`resolve_users`].
fn resolve_tasks(
    state: &StoreState,
    field: &str,
    ids: &[TaskId],
    this: Option<&TaskId>,
) -> StoreResult<Vec<TaskId>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if this == Some(id) {
            return Err(StoreError::invalid_reference(
                field,
                id.as_str(),
                "task references itself",
            ));
        }
        if state.task(id).is_none() {
            return Err(StoreError::not_found(EntityKind::Task, field, id.as_str()));
        }
        append_unique(&mut out, id.clone());
    }
    Ok(out)
}

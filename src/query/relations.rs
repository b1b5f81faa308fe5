//! Relationship traversals anchored on a single entity.
//!
//! Every function fails with `NotFound` when the anchoring id does not
//! resolve, so callers can tell "no related entities" from "no such entity".

use std::sync::Arc;

use crate::collections::unique;
use crate::error::{StoreError, StoreResult};
use crate::model::{EntityKind, Project, ProjectId, Task, TaskId, User, UserId};
use crate::storage::state::StoreState;

use super::engine::{project_member_ids, user_project_ids};

fn require_project<'a>(state: &'a StoreState, id: &ProjectId) -> StoreResult<&'a Arc<Project>> {
    state
        .project(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Project, "id", id.as_str()))
}

fn require_task<'a>(state: &'a StoreState, id: &TaskId) -> StoreResult<&'a Arc<Task>> {
    state
        .task(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Task, "id", id.as_str()))
}

fn require_user<'a>(state: &'a StoreState, id: &UserId) -> StoreResult<&'a Arc<User>> {
    state
        .user(id)
        .ok_or_else(|| StoreError::not_found(EntityKind::User, "id", id.as_str()))
}

/// Distinct assignees and reporters of the project's tasks.
pub(crate) fn project_members(
    state: &StoreState,
    project: &ProjectId,
) -> StoreResult<Vec<Arc<User>>> {
    require_project(state, project)?;
    Ok(project_member_ids(state, project)
        .iter()
        .filter_map(|id| state.user(id).cloned())
        .collect())
}

/// Tasks whose `blocks` list names `task`.
pub(crate) fn blocking_tasks(state: &StoreState, task: &TaskId) -> StoreResult<Vec<Arc<Task>>> {
    require_task(state, task)?;
    Ok(state
        .tasks
        .iter()
        .filter(|t| &t.id != task && t.blocks.contains(task))
        .cloned()
        .collect())
}

/// The task's own `relates_to` followed by every task that relates to it.
pub(crate) fn related_tasks(state: &StoreState, task: &TaskId) -> StoreResult<Vec<Arc<Task>>> {
    let anchor = require_task(state, task)?;
    let outgoing = anchor.relates_to.iter().cloned();
    let incoming = state
        .tasks
        .iter()
        .filter(|t| &t.id != task && t.relates_to.contains(task))
        .map(|t| t.id.clone());
    Ok(unique(outgoing.chain(incoming))
        .iter()
        .filter_map(|id| state.task(id).cloned())
        .collect())
}

pub(crate) fn tasks_by_project(
    state: &StoreState,
    project: &ProjectId,
) -> StoreResult<Vec<Arc<Task>>> {
    require_project(state, project)?;
    Ok(state.tasks_in_project(project).cloned().collect())
}

/// Distinct projects of the tasks the user is assignee or reporter of.
pub(crate) fn user_projects(state: &StoreState, user: &UserId) -> StoreResult<Vec<Arc<Project>>> {
    require_user(state, user)?;
    Ok(user_project_ids(state, user)
        .iter()
        .filter_map(|id| state.project(id).cloned())
        .collect())
}

pub(crate) fn tasks_assigned_to_user(
    state: &StoreState,
    user: &UserId,
) -> StoreResult<Vec<Arc<Task>>> {
    require_user(state, user)?;
    Ok(state
        .tasks
        .iter()
        .filter(|t| t.assignees.contains(user))
        .cloned()
        .collect())
}

pub(crate) fn tasks_reported_by_user(
    state: &StoreState,
    user: &UserId,
) -> StoreResult<Vec<Arc<Task>>> {
    require_user(state, user)?;
    Ok(state
        .tasks
        .iter()
        .filter(|t| t.reporters.contains(user))
        .cloned()
        .collect())
}

pub(crate) fn user_by_email(state: &StoreState, email: &str) -> StoreResult<Arc<User>> {
    state
        .users
        .iter()
        .find(|u| u.email == email)
        .cloned()
        .ok_or_else(|| StoreError::not_found(EntityKind::User, "email", email))
}

/// Resolves every id, in request order. The first unknown id fails the call.
pub(crate) fn users_by_ids(state: &StoreState, ids: &[UserId]) -> StoreResult<Vec<Arc<User>>> {
    ids.iter()
        .map(|id| require_user(state, id).cloned())
        .collect()
}

/// Resolves every id, in request order. The first unknown id fails the call.
pub(crate) fn tasks_by_ids(state: &StoreState, ids: &[TaskId]) -> StoreResult<Vec<Arc<Task>>> {
    ids.iter()
        .map(|id| require_task(state, id).cloned())
        .collect()
}

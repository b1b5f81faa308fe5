use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AccessControl;
use crate::collections::unique;
use crate::config::FieldLimits;
use crate::error::{StoreError, StoreResult};
use crate::model::{
    allocate_id, EntityKind, ProjectId, Task, TaskId, TaskPriority, TaskStatus, UserId,
};
use crate::storage::state::StoreState;

use super::{resolve_tasks, resolve_users, validate};

/// Input for a new task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Creation timestamp; the current time when omitted.
    #[serde(default)]
    pub creation: Option<DateTime<Utc>>,
    /// Unique title.
    pub title: String,
    /// Owning project; must exist.
    pub project: ProjectId,
    /// Initial status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Initial priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional deadline.
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    /// Labels; duplicates are dropped.
    #[serde(default)]
    pub tags: Vec<String>,
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

/// Full replacement of a task's editable fields. The creation timestamp is
/// kept.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub id: TaskId,
    pub title: String,
    pub project: ProjectId,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub assignees: Vec<UserId>,
    #[serde(default)]
    pub reporters: Vec<UserId>,
    #[serde(default)]
    pub blocks: Vec<TaskId>,
    #[serde(default)]
    pub relates_to: Vec<TaskId>,
}

fn validate_fields(
    limits: &FieldLimits,
    title: &str,
    description: Option<&str>,
    tags: &[String],
) -> StoreResult<()> {
    validate::length("title", title, limits.task_title_min, limits.task_title_max)?;
    if let Some(d) = description {
        validate::max_length("description", d, limits.task_description_max)?;
    }
    for tag in tags {
        validate::length("tags", tag, limits.task_tag_min, limits.task_tag_max)?;
    }
    Ok(())
}

fn check_unique(state: &StoreState, this: Option<&TaskId>, title: &str) -> StoreResult<()> {
    let taken = state
        .tasks
        .iter()
        .any(|t| Some(&t.id) != this && t.title == title);
    if taken {
        return Err(StoreError::conflict(EntityKind::Task, "title", title));
    }
    Ok(())
}

/// Resolved and deduplicated references of a task.
struct Links {
    project: ProjectId,
    assignees: Vec<UserId>,
    reporters: Vec<UserId>,
    blocks: Vec<TaskId>,
    relates_to: Vec<TaskId>,
}

fn resolve_links(
    state: &StoreState,
    this: Option<&TaskId>,
    project: &ProjectId,
    assignees: &[UserId],
    reporters: &[UserId],
    blocks: &[TaskId],
    relates_to: &[TaskId],
) -> StoreResult<Links> {
    if state.project(project).is_none() {
        return Err(StoreError::not_found(EntityKind::Project, "project", project.as_str()));
    }
    Ok(Links {
        project: project.clone(),
        assignees: resolve_users(state, "assignees", assignees, None)?,
        reporters: resolve_users(state, "reporters", reporters, None)?,
        blocks: resolve_tasks(state, "blocks", blocks, this)?,
        relates_to: resolve_tasks(state, "relatesTo", relates_to, this)?,
    })
}

pub(crate) fn create_task(
    state: &mut StoreState,
    caller: &dyn AccessControl,
    input: NewTask,
    limits: &FieldLimits,
) -> StoreResult<Arc<Task>> {
    caller.require_authenticated()?;

    validate_fields(limits, &input.title, input.description.as_deref(), &input.tags)?;
    check_unique(state, None, &input.title)?;
    let links = resolve_links(
        state,
        None,
        &input.project,
        &input.assignees,
        &input.reporters,
        &input.blocks,
        &input.relates_to,
    )?;

    let id = TaskId::new(allocate_id(TaskId::PREFIX, &input.title, |c| {
        state.task_id_taken(c)
    }));
    let task = Arc::new(Task {
        id,
        title: input.title,
        description: input.description,
        priority: input.priority,
        status: input.status,
        creation: input.creation.unwrap_or_else(Utc::now),
        due: input.due,
        tags: unique(input.tags),
        project: links.project,
        assignees: links.assignees,
        reporters: links.reporters,
        blocks: links.blocks,
        relates_to: links.relates_to,
    });
    state.tasks.push(Arc::clone(&task));

    info!(task_id = %task.id, project_id = %task.project, "task created");
    Ok(task)
}

pub(crate) fn update_task(
    state: &mut StoreState,
    caller: &dyn AccessControl,
    input: TaskUpdate,
    limits: &FieldLimits,
) -> StoreResult<Arc<Task>> {
    caller.require_authenticated()?;

    let current = state
        .task(&input.id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(EntityKind::Task, "id", input.id.as_str()))?;

    validate_fields(limits, &input.title, input.description.as_deref(), &input.tags)?;
    check_unique(state, Some(&current.id), &input.title)?;
    let links = resolve_links(
        state,
        Some(&current.id),
        &input.project,
        &input.assignees,
        &input.reporters,
        &input.blocks,
        &input.relates_to,
    )?;

    let next = Task {
        id: current.id.clone(),
        title: input.title,
        description: input.description,
        priority: input.priority,
        status: input.status,
        creation: current.creation,
        due: input.due,
        tags: unique(input.tags),
        project: links.project,
        assignees: links.assignees,
        reporters: links.reporters,
        blocks: links.blocks,
        relates_to: links.relates_to,
    };
    let task = state
        .replace_task(next)
        .ok_or_else(|| StoreError::internal(format!("task {} vanished during update", current.id)))?;

    info!(task_id = %task.id, status = %task.status, "task updated");
    Ok(task)
}

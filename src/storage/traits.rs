//! Store contracts.
//!
//! Readers get `Arc` snapshots: the entities are shared with the store and
//! never change after being handed out. A later write replaces the store's
//! `Arc` instead of mutating the old one.

use std::sync::Arc;

use crate::auth::AccessControl;
use crate::error::StoreResult;
use crate::model::{Project, ProjectId, Task, TaskId, User, UserId};
use crate::mutation::{NewProject, NewTask, NewUser, ProjectUpdate, TaskUpdate, UserUpdate};
use crate::query::{ProjectsQuery, TasksQuery, UsersQuery};

/// Read side of the store.
///
/// Every lookup that anchors on an id fails with `NotFound` if the id does
/// not resolve.
pub trait StoreReader: Send + Sync {
    /// Get a user by id.
    fn user_by_id(&self, id: &UserId) -> StoreResult<Arc<User>>;

    /// Get a user by exact email address.
    fn user_by_email(&self, email: &str) -> StoreResult<Arc<User>>;

    /// Get a project by id.
    fn project_by_id(&self, id: &ProjectId) -> StoreResult<Arc<Project>>;

    /// Get a task by id.
    fn task_by_id(&self, id: &TaskId) -> StoreResult<Arc<Task>>;

    /// Resolve several user ids at once, in request order.
    fn users_by_ids(&self, ids: &[UserId]) -> StoreResult<Vec<Arc<User>>>;

    /// Resolve several task ids at once, in request order.
    fn tasks_by_ids(&self, ids: &[TaskId]) -> StoreResult<Vec<Arc<Task>>>;

    /// Filtered, sorted and limited user listing.
    fn users(&self, query: &UsersQuery) -> StoreResult<Vec<Arc<User>>>;

    /// Filtered, sorted and limited project listing.
    fn projects(&self, query: &ProjectsQuery) -> StoreResult<Vec<Arc<Project>>>;

    /// Filtered, sorted and limited task listing.
    fn tasks(&self, query: &TasksQuery) -> StoreResult<Vec<Arc<Task>>>;

    /// Users that are assignees or reporters of any of the project's tasks.
    fn project_members(&self, project: &ProjectId) -> StoreResult<Vec<Arc<User>>>;

    /// Tasks that block the given task.
    fn blocking_tasks(&self, task: &TaskId) -> StoreResult<Vec<Arc<Task>>>;

    /// Tasks related to the given task, in either direction.
    fn related_tasks(&self, task: &TaskId) -> StoreResult<Vec<Arc<Task>>>;

    /// Tasks filed under the project.
    fn tasks_by_project(&self, project: &ProjectId) -> StoreResult<Vec<Arc<Task>>>;

    /// Projects of the tasks the user is assignee or reporter of.
    fn user_projects(&self, user: &UserId) -> StoreResult<Vec<Arc<Project>>>;

    /// Tasks the user is assigned to.
    fn tasks_assigned_to_user(&self, user: &UserId) -> StoreResult<Vec<Arc<Task>>>;

    /// Tasks the user reported.
    fn tasks_reported_by_user(&self, user: &UserId) -> StoreResult<Vec<Arc<Task>>>;
}

/// Write side of the store.
///
/// # Errors
///
/// All methods return `Unauthenticated`/`Unauthorized` before any other
/// check, then `NotFound` for an unknown target, `Validation`, `Conflict`,
/// `NotFound` for dangling references and `InvalidReference` for
/// self-references. A failed call changes nothing.
pub trait StoreWriter: Send + Sync {
    /// Sign up a new user. Not gated on the caller.
    fn create_user(&self, caller: &dyn AccessControl, input: NewUser) -> StoreResult<Arc<User>>;

    /// Update a user. Only the user itself may do so.
    fn update_user(&self, caller: &dyn AccessControl, input: UserUpdate) -> StoreResult<Arc<User>>;

    /// Create a project. Requires an authenticated caller.
    fn create_project(&self, caller: &dyn AccessControl, input: NewProject) -> StoreResult<Arc<Project>>;

    /// Update a project. Requires an authenticated caller.
    fn update_project(
        &self,
        caller: &dyn AccessControl,
        input: ProjectUpdate,
    ) -> StoreResult<Arc<Project>>;

    /// Create a task. Requires an authenticated caller.
    fn create_task(&self, caller: &dyn AccessControl, input: NewTask) -> StoreResult<Arc<Task>>;

    /// Update a task. Requires an authenticated caller.
    fn update_task(&self, caller: &dyn AccessControl, input: TaskUpdate) -> StoreResult<Arc<Task>>;
}

//! In-memory store.
//!
//! One `RwLock` guards all three collections. Reads hold the shared lock for
//! the whole lookup or query; writes hold the exclusive lock across
//! validation, reference resolution and commit. Notifications are sent after
//! the write lock is released.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{AccessControl, Bootstrap};
use crate::config::{FieldLimits, StoreConfig};
use crate::error::{StoreError, StoreResult};
use crate::model::{EntityKind, Project, ProjectId, Task, TaskId, User, UserId};
use crate::mutation::{self, NewProject, NewTask, NewUser, ProjectUpdate, TaskUpdate, UserUpdate};
use crate::notify::{NoopNotifier, Notifier};
use crate::query::{self, relations, ProjectsQuery, TasksQuery, UsersQuery};
use crate::seed::SeedData;

use super::state::StoreState;
use super::traits::{StoreReader, StoreWriter};

fn lock_err(context: &'static str) -> StoreError {
    warn!(context, "store lock poisoned");
    StoreError::internal(format!("poisoned lock: {context}"))
}

/// Entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of users.
    pub users: usize,
    /// Number of projects.
    pub projects: usize,
    /// Number of tasks.
    pub tasks: usize,
}

/// Thread-safe in-memory Users/Projects/Tasks store.
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
}

impl fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store with default limits and no notifications.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store without notifications.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_notifier(config, Arc::new(NoopNotifier))
    }

    /// Create an empty store reporting committed task and project writes to
    /// `notifier`.
    #[must_use]
    pub fn with_notifier(config: StoreConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            notifier,
            config,
        }
    }

    /// The configuration the store was built with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current entity counts.
    ///
    /// # Errors
    ///
    /// `Internal` if the lock is poisoned.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let state = self.read("store.stats")?;
        Ok(StoreStats {
            users: state.users.len(),
            projects: state.projects.len(),
            tasks: state.tasks.len(),
        })
    }

    /// Applies `data` as one unit: users, then projects, then tasks.
    ///
    /// Records go through the regular validation and reference checks but
    /// skip caller authorization. If any record fails, nothing is imported.
    /// Imports emit no notifications.
    ///
    /// # Errors
    ///
    /// The first record's error, unchanged.
    pub fn import(&self, data: SeedData) -> StoreResult<StoreStats> {
        let mut state = self.write("store.import")?;
        let limits = &self.config.limits;
        let mut next = state.clone();

        for user in data.users {
            mutation::create_user(&mut next, &Bootstrap, user, limits)?;
        }
        for project in data.projects {
            mutation::create_project(&mut next, &Bootstrap, project, limits)?;
        }
        for task in data.tasks {
            mutation::create_task(&mut next, &Bootstrap, task, limits)?;
        }

        let stats = StoreStats {
            users: next.users.len(),
            projects: next.projects.len(),
            tasks: next.tasks.len(),
        };
        *state = next;
        info!(
            users = stats.users,
            projects = stats.projects,
            tasks = stats.tasks,
            "dataset imported"
        );
        Ok(stats)
    }

    fn read(&self, context: &'static str) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| lock_err(context))
    }

    fn write(&self, context: &'static str) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| lock_err(context))
    }

    /// Runs one mutation under the write lock. The guard is dropped before
    /// this returns, so callers notify without holding it.
    fn mutate<T>(
        &self,
        context: &'static str,
        f: impl FnOnce(&mut StoreState, &FieldLimits) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut state = self.write(context)?;
        f(&mut state, &self.config.limits).map_err(|err| {
            debug!(context, error = %err, "mutation rejected");
            err
        })
    }
}

impl StoreReader for InMemoryStore {
    fn user_by_id(&self, id: &UserId) -> StoreResult<Arc<User>> {
        let state = self.read("user.by_id")?;
        state
            .user(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::User, "id", id.as_str()))
    }

    fn user_by_email(&self, email: &str) -> StoreResult<Arc<User>> {
        let state = self.read("user.by_email")?;
        relations::user_by_email(&state, email)
    }

    fn project_by_id(&self, id: &ProjectId) -> StoreResult<Arc<Project>> {
        let state = self.read("project.by_id")?;
        state
            .project(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Project, "id", id.as_str()))
    }

    fn task_by_id(&self, id: &TaskId) -> StoreResult<Arc<Task>> {
        let state = self.read("task.by_id")?;
        state
            .task(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Task, "id", id.as_str()))
    }

    fn users_by_ids(&self, ids: &[UserId]) -> StoreResult<Vec<Arc<User>>> {
        let state = self.read("user.by_ids")?;
        relations::users_by_ids(&state, ids)
    }

    fn tasks_by_ids(&self, ids: &[TaskId]) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.by_ids")?;
        relations::tasks_by_ids(&state, ids)
    }

    fn users(&self, query: &UsersQuery) -> StoreResult<Vec<Arc<User>>> {
        let state = self.read("user.list")?;
        Ok(query::query_users(&state, query))
    }

    fn projects(&self, query: &ProjectsQuery) -> StoreResult<Vec<Arc<Project>>> {
        let state = self.read("project.list")?;
        Ok(query::query_projects(&state, query))
    }

    fn tasks(&self, query: &TasksQuery) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.list")?;
        Ok(query::query_tasks(&state, query))
    }

    fn project_members(&self, project: &ProjectId) -> StoreResult<Vec<Arc<User>>> {
        let state = self.read("project.members")?;
        relations::project_members(&state, project)
    }

    fn blocking_tasks(&self, task: &TaskId) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.blocking")?;
        relations::blocking_tasks(&state, task)
    }

    fn related_tasks(&self, task: &TaskId) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.related")?;
        relations::related_tasks(&state, task)
    }

    fn tasks_by_project(&self, project: &ProjectId) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.by_project")?;
        relations::tasks_by_project(&state, project)
    }

    fn user_projects(&self, user: &UserId) -> StoreResult<Vec<Arc<Project>>> {
        let state = self.read("user.projects")?;
        relations::user_projects(&state, user)
    }

    fn tasks_assigned_to_user(&self, user: &UserId) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.assigned_to")?;
        relations::tasks_assigned_to_user(&state, user)
    }

    fn tasks_reported_by_user(&self, user: &UserId) -> StoreResult<Vec<Arc<Task>>> {
        let state = self.read("task.reported_by")?;
        relations::tasks_reported_by_user(&state, user)
    }
}

impl StoreWriter for InMemoryStore {
    fn create_user(&self, caller: &dyn AccessControl, input: NewUser) -> StoreResult<Arc<User>> {
        self.mutate("user.create", |state, limits| {
            mutation::create_user(state, caller, input, limits)
        })
    }

    fn update_user(&self, caller: &dyn AccessControl, input: UserUpdate) -> StoreResult<Arc<User>> {
        self.mutate("user.update", |state, limits| {
            mutation::update_user(state, caller, input, limits)
        })
    }

    fn create_project(&self, caller: &dyn AccessControl, input: NewProject) -> StoreResult<Arc<Project>> {
        let project = self.mutate("project.create", |state, limits| {
            mutation::create_project(state, caller, input, limits)
        })?;
        self.notifier.project_upserted(&project);
        Ok(project)
    }

    fn update_project(
        &self,
        caller: &dyn AccessControl,
        input: ProjectUpdate,
    ) -> StoreResult<Arc<Project>> {
        let project = self.mutate("project.update", |state, limits| {
            mutation::update_project(state, caller, input, limits)
        })?;
        self.notifier.project_upserted(&project);
        Ok(project)
    }

    fn create_task(&self, caller: &dyn AccessControl, input: NewTask) -> StoreResult<Arc<Task>> {
        let task = self.mutate("task.create", |state, limits| {
            mutation::create_task(state, caller, input, limits)
        })?;
        self.notifier.task_upserted(&task);
        Ok(task)
    }

    fn update_task(&self, caller: &dyn AccessControl, input: TaskUpdate) -> StoreResult<Arc<Task>> {
        let task = self.mutate("task.update", |state, limits| {
            mutation::update_task(state, caller, input, limits)
        })?;
        self.notifier.task_upserted(&task);
        Ok(task)
    }
}

//! The three collections guarded by the store lock.
//!
//! Nothing here locks: every method runs under whatever guard the calling
//! `InMemoryStore` method already holds.

use std::sync::Arc;

use crate::model::{Project, ProjectId, Task, TaskId, User, UserId};

/// Insertion-ordered entity collections.
///
/// Entities are held behind `Arc` and replaced wholesale on update
/// (copy-on-write), so a snapshot handed to a reader is never mutated.
#[derive(Debug, Default, Clone)]
pub(crate) struct StoreState {
    pub users: Vec<Arc<User>>,
    pub projects: Vec<Arc<Project>>,
    pub tasks: Vec<Arc<Task>>,
}

impl StoreState {
    pub fn user(&self, id: &UserId) -> Option<&Arc<User>> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Arc<Project>> {
        self.projects.iter().find(|p| &p.id == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn user_id_taken(&self, id: &str) -> bool {
        self.users.iter().any(|u| u.id.as_str() == id)
    }

    pub fn project_id_taken(&self, id: &str) -> bool {
        self.projects.iter().any(|p| p.id.as_str() == id)
    }

    pub fn task_id_taken(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id.as_str() == id)
    }

    /// Applies `f` to a copy of the user and swaps the copy in.
    ///
    /// Returns the new `Arc`, or `None` if the id does not resolve.
    pub fn modify_user(&mut self, id: &UserId, f: impl FnOnce(&mut User)) -> Option<Arc<User>> {
        let slot = self.users.iter_mut().find(|u| &u.id == id)?;
        let mut next = User::clone(slot);
        f(&mut next);
        *slot = Arc::new(next);
        Some(Arc::clone(slot))
    }

    pub fn replace_project(&mut self, project: Project) -> Option<Arc<Project>> {
        let slot = self.projects.iter_mut().find(|p| p.id == project.id)?;
        *slot = Arc::new(project);
        Some(Arc::clone(slot))
    }

    pub fn replace_task(&mut self, task: Task) -> Option<Arc<Task>> {
        let slot = self.tasks.iter_mut().find(|t| t.id == task.id)?;
        *slot = Arc::new(task);
        Some(Arc::clone(slot))
    }

    /// Tasks filed under `project`, in insertion order.
    pub fn tasks_in_project<'a>(
        &'a self,
        project: &'a ProjectId,
    ) -> impl Iterator<Item = &'a Arc<Task>> + 'a {
        self.tasks.iter().filter(move |t| &t.project == project)
    }
}

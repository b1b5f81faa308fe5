//! Change notification.
//!
//! The store reports every committed task and project write to a
//! [`Notifier`] after releasing its write lock. [`UpsertBroadcaster`] is the
//! stock implementation: it fans events out to subscribers through bounded,
//! non-blocking channels so a slow subscriber can never stall writers.

mod broadcast;
mod subscription;

use std::sync::Arc;

use crate::config::NotificationConfig;
use crate::model::{Project, Task};

pub use broadcast::Broadcaster;
pub use subscription::{RecvError, Subscription, SubscriptionId};

/// Sink for committed writes. Fire-and-forget: implementations must not
/// block.
pub trait Notifier: Send + Sync {
    /// A task was created or updated.
    fn task_upserted(&self, task: &Arc<Task>);

    /// A project was created or updated.
    fn project_upserted(&self, project: &Arc<Project>);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn task_upserted(&self, _task: &Arc<Task>) {}

    fn project_upserted(&self, _project: &Arc<Project>) {}
}

/// Broadcasts task and project upserts on two independent channels.
#[derive(Debug)]
pub struct UpsertBroadcaster {
    tasks: Broadcaster<Arc<Task>>,
    projects: Broadcaster<Arc<Project>>,
}

impl UpsertBroadcaster {
    /// Creates a broadcaster with the configured per-subscriber buffer.
    #[must_use]
    pub fn new(cfg: &NotificationConfig) -> Self {
        Self {
            tasks: Broadcaster::new(cfg.subscriber_capacity),
            projects: Broadcaster::new(cfg.subscriber_capacity),
        }
    }

    /// Subscribes to task upserts.
    pub fn subscribe_tasks(&self) -> Subscription<Arc<Task>> {
        self.tasks.subscribe()
    }

    /// Subscribes to project upserts.
    pub fn subscribe_projects(&self) -> Subscription<Arc<Project>> {
        self.projects.subscribe()
    }

    /// The task channel.
    #[must_use]
    pub const fn tasks(&self) -> &Broadcaster<Arc<Task>> {
        &self.tasks
    }

    /// The project channel.
    #[must_use]
    pub const fn projects(&self) -> &Broadcaster<Arc<Project>> {
        &self.projects
    }
}

impl Default for UpsertBroadcaster {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

impl Notifier for UpsertBroadcaster {
    fn task_upserted(&self, task: &Arc<Task>) {
        self.tasks.publish(task);
    }

    fn project_upserted(&self, project: &Arc<Project>) {
        self.projects.publish(project);
    }
}

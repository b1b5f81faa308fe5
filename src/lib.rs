//! # taskhub - in-memory task tracking store
//!
//! taskhub holds the Users/Projects/Tasks graph of a task-tracking backend in
//! memory. It answers filtered, sorted and limited listings, performs writes
//! that keep every reference between entities valid, and is safe to share
//! between any number of request threads.
//!
//! ## Core Concepts
//!
//! - **Entity**: a `User`, `Project` or `Task`; relations are stored as typed ids
//! - **Snapshot**: readers receive `Arc`s that never change once handed out
//! - **ListQuery**: conjunctive filters, one sort key, one direction, a limit
//! - **Notifier**: receives every committed task and project write
//!
//! ## Usage
//!
//! ```rust
//! use taskhub::{Caller, InMemoryStore, NewProject, NewTask, NewUser, StoreReader, StoreWriter};
//!
//! let store = InMemoryStore::new();
//! let ryan = store.create_user(&Caller::anonymous(), NewUser {
//!     email: "ryan.lindsey@taskhub.io".into(),
//!     password_hash: "$2b$10$x".into(),
//!     display_name: "Ryan Lindsey".into(),
//!     role: "Engineering Manager".into(),
//!     location: String::new(),
//!     manager: None,
//!     subordinates: Vec::new(),
//! })?;
//!
//! let caller = Caller::user(ryan.id.as_str());
//! let project = store.create_project(&caller, NewProject {
//!     creation: None,
//!     name: "Core Migration".into(),
//!     description: String::new(),
//!     slug: "CORM".into(),
//!     owners: vec![ryan.id.clone()],
//! })?;
//!
//! let task = store.create_task(&caller, NewTask {
//!     creation: None,
//!     title: "Implement database migration".into(),
//!     project: project.id.clone(),
//!     status: Default::default(),
//!     priority: Default::default(),
//!     description: None,
//!     due: None,
//!     tags: vec!["db".into()],
//!     assignees: vec![ryan.id.clone()],
//!     reporters: Vec::new(),
//!     blocks: Vec::new(),
//!     relates_to: Vec::new(),
//! })?;
//!
//! assert_eq!(store.tasks_by_project(&project.id)?[0].id, task.id);
//! # Ok::<(), taskhub::StoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod collections;
pub mod config;
pub mod error;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod seed;
pub mod storage;

pub use auth::{AccessControl, Caller};
pub use config::{FieldLimits, NotificationConfig, StoreConfig};
pub use error::{StoreError, StoreResult, ValidationError};
pub use model::{
    EntityKind, Project, ProjectId, Task, TaskId, TaskPriority, TaskStatus, User, UserId,
};
pub use mutation::{NewProject, NewTask, NewUser, ProjectUpdate, TaskUpdate, UserUpdate};
pub use notify::{Broadcaster, NoopNotifier, Notifier, RecvError, Subscription, UpsertBroadcaster};
pub use query::{
    ListQuery, ProjectsFilters, ProjectsOrder, ProjectsQuery, TasksFilters, TasksOrder,
    TasksQuery, UsersFilters, UsersOrder, UsersQuery,
};
pub use seed::SeedData;
pub use storage::{InMemoryStore, StoreReader, StoreStats, StoreWriter};

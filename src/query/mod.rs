//! Listing queries: filters, sort keys and limits.
//!
//! A [`ListQuery`] bundles the optional filter set, the optional sort key, a
//! single direction flag and an optional result cap for one entity type.
//!
//! ```
//! use taskhub::query::{TasksFilters, TasksOrder, TasksQuery};
//! use taskhub::model::TaskStatus;
//!
//! let q = TasksQuery::new()
//!     .filters(TasksFilters {
//!         status: Some(vec![TaskStatus::Todo]),
//!         ..TasksFilters::default()
//!     })
//!     .order(TasksOrder::Priority)
//!     .descending()
//!     .limit(10);
//! assert!(!q.ascending);
//! ```

mod engine;
mod filters;
mod order;
pub(crate) mod relations;

use serde::{Deserialize, Serialize};

pub use filters::{ProjectsFilters, TasksFilters, UsersFilters};
pub use order::{ProjectsOrder, TasksOrder, UsersOrder};

pub(crate) use engine::{query_projects, query_tasks, query_users};

/// Filter set, sort key, direction and cap for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery<F, O> {
    /// Conjunctive filters; `None` keeps everything.
    pub filters: Option<F>,
    /// Sort key; `None` keeps insertion order.
    pub order: Option<O>,
    /// Direction applied to `order`. Defaults to ascending.
    pub ascending: bool,
    /// Maximum number of results, applied after sorting.
    pub limit: Option<usize>,
}

impl<F, O> Default for ListQuery<F, O> {
    fn default() -> Self {
        Self {
            filters: None,
            order: None,
            ascending: true,
            limit: None,
        }
    }
}

impl<F, O> ListQuery<F, O> {
    /// An unfiltered, unsorted, unlimited listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter set.
    #[must_use]
    pub fn filters(mut self, filters: F) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Sets the sort key.
    #[must_use]
    pub fn order(mut self, order: O) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the direction explicitly.
    #[must_use]
    pub const fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Sorts in descending order.
    #[must_use]
    pub const fn descending(self) -> Self {
        self.ascending(false)
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// User listing.
pub type UsersQuery = ListQuery<UsersFilters, UsersOrder>;
/// Project listing.
pub type ProjectsQuery = ListQuery<ProjectsFilters, ProjectsOrder>;
/// Task listing.
pub type TasksQuery = ListQuery<TasksFilters, TasksOrder>;

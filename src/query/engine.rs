//! Filter, sort and limit evaluation over a state snapshot.
//!
//! Each listing starts from a shallow copy of the collection, narrows it with
//! the supplied filters in a fixed order and stops as soon as one filter
//! leaves nothing, then sorts and truncates. The store's own vectors are never
//! reordered.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::collections::{
    contains, copy, filter_in_place, is_subset, is_subset_by, sort_and_limit, unique,
};
use crate::model::{Project, ProjectId, Task, User, UserId};
use crate::storage::state::StoreState;

use super::{ProjectsOrder, ProjectsQuery, TasksOrder, TasksQuery, UsersOrder, UsersQuery};

type Comparator<'a, T> = Box<dyn Fn(&Arc<T>, &Arc<T>) -> Ordering + 'a>;

/// Narrows `items` and returns from the enclosing function with an empty
/// result once nothing is left.
macro_rules! narrow {
    ($items:ident, $pred:expr) => {
        if !filter_in_place(&mut $items, $pred) {
            return Vec::new();
        }
    };
}

const fn directed(ord: Ordering, ascending: bool) -> Ordering {
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// Distinct assignees and reporters across the project's tasks, first-seen order.
pub(crate) fn project_member_ids(state: &StoreState, project: &ProjectId) -> Vec<UserId> {
    unique(
        state
            .tasks_in_project(project)
            .flat_map(|t| t.assignees.iter().chain(t.reporters.iter()))
            .cloned(),
    )
}

fn task_project<'a>(task: &'a &Arc<Task>) -> &'a ProjectId {
    &task.project
}

/// Distinct projects of the tasks `user` is an assignee or reporter of.
pub(crate) fn user_project_ids(state: &StoreState, user: &UserId) -> Vec<ProjectId> {
    unique(
        state
            .tasks
            .iter()
            .filter(|t| t.involves(user))
            .map(|t| t.project.clone()),
    )
}

pub(crate) fn query_users(state: &StoreState, query: &UsersQuery) -> Vec<Arc<User>> {
    let mut users = copy(&state.users);

    if let Some(filters) = &query.filters {
        if let Some(projects) = &filters.projects {
            narrow!(users, |u: &Arc<User>| {
                let involved: Vec<&Arc<Task>> =
                    state.tasks.iter().filter(|t| t.involves(&u.id)).collect();
                is_subset_by(projects, &involved, task_project)
            });
        }
    }

    let cmp = query.order.map(|order| users_cmp(order, query.ascending));
    sort_and_limit(users, cmp, query.limit)
}

pub(crate) fn query_projects(state: &StoreState, query: &ProjectsQuery) -> Vec<Arc<Project>> {
    let mut projects = copy(&state.projects);

    if let Some(filters) = &query.filters {
        if let Some(after) = filters.created_after {
            narrow!(projects, |p: &Arc<Project>| {
                p.creation.timestamp() > after.timestamp()
            });
        }
        if let Some(before) = filters.created_before {
            narrow!(projects, |p: &Arc<Project>| {
                p.creation.timestamp() < before.timestamp()
            });
        }
        if let Some(members) = &filters.members {
            narrow!(projects, |p: &Arc<Project>| {
                is_subset(members, &project_member_ids(state, &p.id))
            });
        }
        if let Some(owners) = &filters.owners {
            narrow!(projects, |p: &Arc<Project>| is_subset(owners, &p.owners));
        }
    }

    let cmp = query
        .order
        .map(|order| projects_cmp(state, order, query.ascending));
    sort_and_limit(projects, cmp, query.limit)
}

pub(crate) fn query_tasks(state: &StoreState, query: &TasksQuery) -> Vec<Arc<Task>> {
    let mut tasks = copy(&state.tasks);

    if let Some(filters) = &query.filters {
        if let Some(after) = filters.created_after {
            narrow!(tasks, |t: &Arc<Task>| {
                t.creation.timestamp() > after.timestamp()
            });
        }
        if let Some(before) = filters.created_before {
            narrow!(tasks, |t: &Arc<Task>| {
                t.creation.timestamp() < before.timestamp()
            });
        }
        if let Some(assignees) = &filters.assignees {
            narrow!(tasks, |t: &Arc<Task>| is_subset(assignees, &t.assignees));
        }
        if let Some(reporters) = &filters.reporters {
            narrow!(tasks, |t: &Arc<Task>| is_subset(reporters, &t.reporters));
        }
        if let Some(tags) = &filters.tags {
            narrow!(tasks, |t: &Arc<Task>| is_subset(tags, &t.tags));
        }
        if let Some(status) = &filters.status {
            narrow!(tasks, |t: &Arc<Task>| contains(status, &t.status));
        }
        if let Some(projects) = &filters.projects {
            narrow!(tasks, |t: &Arc<Task>| contains(projects, &t.project));
        }
    }

    let cmp = query.order.map(|order| tasks_cmp(order, query.ascending));
    sort_and_limit(tasks, cmp, query.limit)
}

fn users_cmp(order: UsersOrder, ascending: bool) -> Comparator<'static, User> {
    match order {
        UsersOrder::NameAlpha => Box::new(move |a: &Arc<User>, b: &Arc<User>| {
            directed(a.display_name.cmp(&b.display_name), ascending)
        }),
    }
}

fn projects_cmp(
    state: &StoreState,
    order: ProjectsOrder,
    ascending: bool,
) -> Comparator<'static, Project> {
    match order {
        ProjectsOrder::NameAlpha => Box::new(move |a: &Arc<Project>, b: &Arc<Project>| {
            directed(a.name.cmp(&b.name), ascending)
        }),
        ProjectsOrder::NumMembers => {
            // Member counts scan the task collection; compute them once per query.
            let counts: HashMap<ProjectId, usize> = state
                .projects
                .iter()
                .map(|p| (p.id.clone(), project_member_ids(state, &p.id).len()))
                .collect();
            by_count(counts, ascending)
        }
        ProjectsOrder::NumTasks => {
            let mut counts: HashMap<ProjectId, usize> = HashMap::new();
            for t in &state.tasks {
                *counts.entry(t.project.clone()).or_default() += 1;
            }
            by_count(counts, ascending)
        }
    }
}

fn by_count(counts: HashMap<ProjectId, usize>, ascending: bool) -> Comparator<'static, Project> {
    Box::new(move |a: &Arc<Project>, b: &Arc<Project>| {
        let ca = counts.get(&a.id).copied().unwrap_or(0);
        let cb = counts.get(&b.id).copied().unwrap_or(0);
        directed(ca.cmp(&cb), ascending)
    })
}

fn tasks_cmp(order: TasksOrder, ascending: bool) -> Comparator<'static, Task> {
    match order {
        TasksOrder::TitleAlpha => Box::new(move |a: &Arc<Task>, b: &Arc<Task>| {
            directed(a.title.cmp(&b.title), ascending)
        }),
        TasksOrder::Priority => Box::new(move |a: &Arc<Task>, b: &Arc<Task>| {
            directed(a.priority.cmp(&b.priority), ascending)
        }),
        TasksOrder::DueTime => Box::new(move |a: &Arc<Task>, b: &Arc<Task>| {
            let ord = match (a.due, b.due) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            directed(ord, ascending)
        }),
        TasksOrder::CreationTime => Box::new(move |a: &Arc<Task>, b: &Arc<Task>| {
            directed(a.creation.cmp(&b.creation), ascending)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::model::{TaskId, TaskPriority, TaskStatus};
    use crate::query::{ListQuery, ProjectsFilters, TasksFilters, UsersFilters};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn user(id: &str, name: &str) -> Arc<User> {
        Arc::new(User {
            id: UserId::new(id),
            email: format!("{id}@example.com"),
            display_name: name.to_string(),
            role: "Engineer".to_string(),
            location: String::new(),
            personal_status: String::new(),
            password_hash: String::new(),
            manager: None,
            subordinates: Vec::new(),
        })
    }

    fn project(id: &str, name: &str, hours: i64) -> Arc<Project> {
        Arc::new(Project {
            id: ProjectId::new(id),
            name: name.to_string(),
            description: String::new(),
            slug: id.to_uppercase(),
            creation: t0() + Duration::hours(hours),
            owners: vec![UserId::new("u1")],
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn task(
        id: &str,
        project: &str,
        priority: TaskPriority,
        status: TaskStatus,
        hours: i64,
        due: Option<i64>,
        assignees: &[&str],
        reporters: &[&str],
        tags: &[&str],
    ) -> Arc<Task> {
        Arc::new(Task {
            id: TaskId::new(id),
            title: id.to_string(),
            description: None,
            priority,
            status,
            creation: t0() + Duration::hours(hours),
            due: due.map(|h| t0() + Duration::hours(h)),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            project: ProjectId::new(project),
            assignees: assignees.iter().map(|s| UserId::new(*s)).collect(),
            reporters: reporters.iter().map(|s| UserId::new(*s)).collect(),
            blocks: Vec::new(),
            relates_to: Vec::new(),
        })
    }

    fn fixture() -> StoreState {
        StoreState {
            users: vec![user("u1", "Carol"), user("u2", "Alice"), user("u3", "Bob")],
            projects: vec![project("p1", "Zeta", 0), project("p2", "Alpha", 2), project("p3", "Mid", 4)],
            tasks: vec![
                task("ta", "p1", TaskPriority::High, TaskStatus::Todo, 1, Some(10), &["u1", "u2"], &["u3"], &["db"]),
                task("tb", "p1", TaskPriority::Low, TaskStatus::Done, 2, None, &["u1"], &["u1"], &["db", "ops"]),
                task("tc", "p2", TaskPriority::Blocker, TaskStatus::InProgress, 3, Some(5), &["u2"], &["u1"], &[]),
                task("td", "p1", TaskPriority::Medium, TaskStatus::Todo, 4, Some(20), &[], &["u2"], &["ops"]),
            ],
        }
    }

    fn ids<T>(items: &[Arc<T>], id: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|x| id(&**x).to_string()).collect()
    }

    fn task_ids(items: &[Arc<Task>]) -> Vec<String> {
        ids(items, |t| t.id.as_str())
    }

    #[test]
    fn no_filters_returns_insertion_order() {
        let state = fixture();
        let out = query_tasks(&state, &ListQuery::new());
        assert_eq!(task_ids(&out), vec!["ta", "tb", "tc", "td"]);
    }

    #[test]
    fn task_subset_filters() {
        let state = fixture();
        let q = ListQuery::new().filters(TasksFilters {
            assignees: Some(vec![UserId::new("u1")]),
            ..TasksFilters::default()
        });
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["ta", "tb"]);

        let q = ListQuery::new().filters(TasksFilters {
            reporters: Some(vec![UserId::new("u1")]),
            ..TasksFilters::default()
        });
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tb", "tc"]);

        let q = ListQuery::new().filters(TasksFilters {
            tags: Some(vec!["db".to_string(), "ops".to_string()]),
            ..TasksFilters::default()
        });
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tb"]);

        // Empty list is vacuously satisfied.
        let q = ListQuery::new().filters(TasksFilters {
            assignees: Some(Vec::new()),
            ..TasksFilters::default()
        });
        assert_eq!(query_tasks(&state, &q).len(), 4);
    }

    #[test]
    fn task_membership_filters() {
        let state = fixture();
        let q = ListQuery::new().filters(TasksFilters {
            status: Some(vec![TaskStatus::Todo, TaskStatus::Done]),
            projects: Some(vec![ProjectId::new("p1")]),
            ..TasksFilters::default()
        });
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["ta", "tb", "td"]);
    }

    #[test]
    fn creation_bounds_are_strict() {
        let state = fixture();
        let q = ListQuery::new().filters(TasksFilters {
            created_after: Some(t0() + Duration::hours(1)),
            created_before: Some(t0() + Duration::hours(4)),
            ..TasksFilters::default()
        });
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tb", "tc"]);
    }

    #[test]
    fn sequential_filters_equal_conjunction() {
        let state = fixture();
        let assignee = TasksFilters {
            assignees: Some(vec![UserId::new("u2")]),
            ..TasksFilters::default()
        };
        let status = TasksFilters {
            status: Some(vec![TaskStatus::Todo]),
            ..TasksFilters::default()
        };
        let both = TasksFilters {
            assignees: assignee.assignees.clone(),
            status: status.status.clone(),
            ..TasksFilters::default()
        };

        let step1 = query_tasks(&state, &ListQuery::new().filters(assignee));
        let narrowed = StoreState {
            tasks: step1,
            ..fixture()
        };
        let step2 = query_tasks(&narrowed, &ListQuery::new().filters(status));
        let one_pass = query_tasks(&state, &ListQuery::new().filters(both));
        assert_eq!(task_ids(&step2), task_ids(&one_pass));
        assert_eq!(task_ids(&one_pass), vec!["ta"]);
    }

    #[test]
    fn missing_tag_empties_the_result() {
        let state = fixture();
        let q = ListQuery::new().filters(TasksFilters {
            tags: Some(vec!["missing".to_string()]),
            status: Some(vec![TaskStatus::Todo]),
            ..TasksFilters::default()
        });
        assert!(query_tasks(&state, &q).is_empty());
    }

    fn narrow_twice(mut items: Vec<u32>, first: u32, later_calls: &Cell<usize>) -> Vec<u32> {
        narrow!(items, |x: &u32| *x > first);
        narrow!(items, |_: &u32| {
            later_calls.set(later_calls.get() + 1);
            true
        });
        items
    }

    #[test]
    fn emptied_candidates_skip_later_filters() {
        let calls = Cell::new(0);
        assert!(narrow_twice(vec![1, 2, 3], 10, &calls).is_empty());
        assert_eq!(calls.get(), 0);

        assert_eq!(narrow_twice(vec![1, 20, 30], 10, &calls), vec![20, 30]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn task_sorts_and_limit() {
        let state = fixture();

        let q = ListQuery::new().order(TasksOrder::Priority).descending();
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tc", "ta", "td", "tb"]);

        let q = ListQuery::new().order(TasksOrder::DueTime);
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tc", "ta", "td", "tb"]);

        let q = ListQuery::new().order(TasksOrder::DueTime).descending();
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["tb", "td", "ta", "tc"]);

        let q = ListQuery::new().order(TasksOrder::CreationTime).descending().limit(2);
        assert_eq!(task_ids(&query_tasks(&state, &q)), vec!["td", "tc"]);

        let q = ListQuery::new().order(TasksOrder::TitleAlpha).limit(0);
        assert!(query_tasks(&state, &q).is_empty());
    }

    #[test]
    fn sorting_does_not_reorder_state() {
        let state = fixture();
        let _ = query_tasks(&state, &ListQuery::new().order(TasksOrder::Priority));
        assert_eq!(task_ids(&state.tasks), vec!["ta", "tb", "tc", "td"]);
    }

    #[test]
    fn users_filtered_by_projects() {
        let state = fixture();
        let q = ListQuery::new()
            .filters(UsersFilters {
                projects: Some(vec![ProjectId::new("p1"), ProjectId::new("p2")]),
            })
            .order(UsersOrder::NameAlpha);
        let out = query_users(&state, &q);
        assert_eq!(ids(&out, |u| u.id.as_str()), vec!["u2", "u1"]);

        let q = ListQuery::new().filters(UsersFilters {
            projects: Some(vec![ProjectId::new("p3")]),
        });
        assert!(query_users(&state, &q).is_empty());
    }

    #[test]
    fn projects_filters_and_derived_orders() {
        let state = fixture();

        let q = ListQuery::new().filters(ProjectsFilters {
            members: Some(vec![UserId::new("u3")]),
            ..ProjectsFilters::default()
        });
        assert_eq!(ids(&query_projects(&state, &q), |p| p.id.as_str()), vec!["p1"]);

        let q = ListQuery::new().filters(ProjectsFilters {
            owners: Some(vec![UserId::new("u1")]),
            created_after: Some(t0()),
            ..ProjectsFilters::default()
        });
        assert_eq!(ids(&query_projects(&state, &q), |p| p.id.as_str()), vec!["p2", "p3"]);

        let q = ListQuery::new().order(ProjectsOrder::NumTasks).descending();
        assert_eq!(ids(&query_projects(&state, &q), |p| p.id.as_str()), vec!["p1", "p2", "p3"]);

        let q = ListQuery::new().order(ProjectsOrder::NumMembers);
        assert_eq!(ids(&query_projects(&state, &q), |p| p.id.as_str()), vec!["p3", "p2", "p1"]);

        let q = ListQuery::new().order(ProjectsOrder::NameAlpha);
        assert_eq!(ids(&query_projects(&state, &q), |p| p.id.as_str()), vec!["p2", "p3", "p1"]);
    }

    #[test]
    fn member_and_project_derivations() {
        let state = fixture();
        assert_eq!(
            project_member_ids(&state, &ProjectId::new("p1")),
            vec![UserId::new("u1"), UserId::new("u2"), UserId::new("u3")]
        );
        assert_eq!(
            user_project_ids(&state, &UserId::new("u2")),
            vec![ProjectId::new("p1"), ProjectId::new("p2")]
        );
        assert!(project_member_ids(&state, &ProjectId::new("p3")).is_empty());
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AccessControl;
use crate::config::FieldLimits;
use crate::error::{StoreError, StoreResult};
use crate::model::{allocate_id, EntityKind, Project, ProjectId, UserId};
use crate::storage::state::StoreState;

use super::{resolve_users, validate};

/// Input for a new project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    /// Creation timestamp; the current time when omitted.
    #[serde(default)]
    pub creation: Option<DateTime<Utc>>,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unique short code, e.g. `CORM`.
    pub slug: String,
    /// Owner user ids; each must exist.
    #[serde(default)]
    pub owners: Vec<UserId>,
}

/// Full replacement of a project's editable fields.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default)]
    pub owners: Vec<UserId>,
}

fn validate_fields(limits: &FieldLimits, name: &str, description: &str, slug: &str) -> StoreResult<()> {
    validate::length("name", name, limits.project_name_min, limits.project_name_max)?;
    validate::max_length("description", description, limits.project_description_max)?;
    validate::max_length("slug", slug, limits.project_slug_max)?;
    Ok(())
}

fn check_unique(state: &StoreState, this: Option<&ProjectId>, name: &str, slug: &str) -> StoreResult<()> {
    for other in state.projects.iter().filter(|p| Some(&p.id) != this) {
        if other.name == name {
            return Err(StoreError::conflict(EntityKind::Project, "name", name));
        }
        if other.slug == slug {
            return Err(StoreError::conflict(EntityKind::Project, "slug", slug));
        }
    }
    Ok(())
}

pub(crate) fn create_project(
    state: &mut StoreState,
    caller: &dyn AccessControl,
    input: NewProject,
    limits: &FieldLimits,
) -> StoreResult<Arc<Project>> {
    caller.require_authenticated()?;

    validate_fields(limits, &input.name, &input.description, &input.slug)?;
    check_unique(state, None, &input.name, &input.slug)?;
    let owners = resolve_users(state, "owners", &input.owners, None)?;

    let id = ProjectId::new(allocate_id(ProjectId::PREFIX, &input.name, |c| {
        state.project_id_taken(c)
    }));
    let project = Arc::new(Project {
        id,
        name: input.name,
        description: input.description,
        slug: input.slug,
        creation: input.creation.unwrap_or_else(Utc::now),
        owners,
    });
    state.projects.push(Arc::clone(&project));

    info!(project_id = %project.id, "project created");
    Ok(project)
}

pub(crate) fn update_project(
    state: &mut StoreState,
    caller: &dyn AccessControl,
    input: ProjectUpdate,
    limits: &FieldLimits,
) -> StoreResult<Arc<Project>> {
    caller.require_authenticated()?;

    let current = state
        .project(&input.id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(EntityKind::Project, "id", input.id.as_str()))?;

    validate_fields(limits, &input.name, &input.description, &input.slug)?;
    check_unique(state, Some(&current.id), &input.name, &input.slug)?;
    let owners = resolve_users(state, "owners", &input.owners, None)?;

    let next = Project {
        name: input.name,
        description: input.description,
        slug: input.slug,
        owners,
        ..Project::clone(&current)
    };
    let project = state
        .replace_project(next)
        .ok_or_else(|| StoreError::internal(format!("project {} vanished during update", current.id)))?;

    info!(project_id = %project.id, "project updated");
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::{Bootstrap, Caller};
    use crate::mutation::fixtures::{new_project, seeded, t0};

    fn update_of(p: &Project) -> ProjectUpdate {
        ProjectUpdate {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            slug: p.slug.clone(),
            owners: p.owners.clone(),
        }
    }

    #[test]
    fn create_requires_authentication() {
        let (mut state, users, _) = seeded();
        let err = create_project(
            &mut state,
            &Caller::anonymous(),
            new_project("Billing", "BILL", &[&users[0]]),
            &FieldLimits::default(),
        )
        .unwrap_err();
        assert_eq!(err, StoreError::Unauthenticated);
        assert_eq!(state.projects.len(), 1);
    }

    #[test]
    fn create_appends_with_deduplicated_owners() {
        let (mut state, users, _) = seeded();
        let caller = Caller::user(users[1].as_str());
        let p = create_project(
            &mut state,
            &caller,
            new_project("Billing Revamp", "BILL", &[&users[1], &users[0], &users[1]]),
            &FieldLimits::default(),
        )
        .unwrap();
        assert_eq!(p.id.as_str(), "project_billing_revamp");
        assert_eq!(p.owners, vec![users[1].clone(), users[0].clone()]);
        assert_eq!(p.creation, t0());
        assert!(Arc::ptr_eq(&p, state.projects.last().unwrap()));
    }

    #[test]
    fn name_and_slug_must_be_unique() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let err = create_project(&mut state, &Bootstrap, new_project("Core Migration", "XYZ", &[]), &limits)
            .unwrap_err();
        assert_eq!(err, StoreError::conflict(EntityKind::Project, "name", "Core Migration"));

        let err = create_project(&mut state, &Bootstrap, new_project("Other Thing", "CORM", &[]), &limits)
            .unwrap_err();
        assert_eq!(err, StoreError::conflict(EntityKind::Project, "slug", "CORM"));

        let err = create_project(
            &mut state,
            &Bootstrap,
            new_project("Other Thing", "TOOLONG", &[&users[0]]),
            &limits,
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(state.projects.len(), 1);
    }

    #[test]
    fn update_keeps_identity_and_creation() {
        let (mut state, users, project) = seeded();
        let limits = FieldLimits::default();
        let caller = Caller::user(users[2].as_str());
        let before = Arc::clone(state.project(&project).unwrap());

        // A no-op update does not collide with itself.
        let same = update_project(&mut state, &caller, update_of(&before), &limits).unwrap();
        assert_eq!(*same, *before);

        let mut upd = update_of(&before);
        upd.name = "Core Migration v2".to_string();
        upd.owners = vec![users[2].clone()];
        let after = update_project(&mut state, &caller, upd, &limits).unwrap();
        assert_eq!(after.id, project);
        assert_eq!(after.creation, before.creation);
        assert_eq!(after.owners, vec![users[2].clone()]);
        // The old snapshot is untouched.
        assert_eq!(before.name, "Core Migration");
    }

    #[test]
    fn update_with_unknown_owner_changes_nothing() {
        let (mut state, users, project) = seeded();
        let before = Arc::clone(state.project(&project).unwrap());
        let mut upd = update_of(&before);
        upd.description = "changed".to_string();
        upd.owners = vec![users[1].clone(), UserId::new("user_ghost")];
        let err = update_project(&mut state, &Caller::user(users[0].as_str()), upd, &FieldLimits::default())
            .unwrap_err();
        assert_eq!(err, StoreError::not_found(EntityKind::User, "owners", "user_ghost"));
        assert!(Arc::ptr_eq(&before, state.project(&project).unwrap()));

        let missing = ProjectUpdate {
            id: ProjectId::new("project_nope"),
            ..update_of(&before)
        };
        let err = update_project(&mut state, &Caller::user(users[0].as_str()), missing, &FieldLimits::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }
}

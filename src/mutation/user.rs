use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AccessControl;
use crate::config::FieldLimits;
use crate::error::{StoreError, StoreResult};
use crate::model::{allocate_id, EntityKind, User, UserId};
use crate::storage::state::StoreState;

use super::{resolve_users, validate};

/// Sign-up input. The password arrives already hashed.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub manager: Option<UserId>,
    #[serde(default)]
    pub subordinates: Vec<UserId>,
}

/// Full replacement of a user's editable fields.
///
/// `personal_status: None` clears the status. `manager` and
/// `subordinates` replace the current relations; counterpart users are
/// updated so both sides stay consistent.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub personal_status: Option<String>,
    #[serde(default)]
    pub manager: Option<UserId>,
    #[serde(default)]
    pub subordinates: Vec<UserId>,
}

fn validate_fields(
    limits: &FieldLimits,
    email: &str,
    display_name: &str,
    role: &str,
    location: &str,
) -> StoreResult<()> {
    validate::email(email)?;
    validate::length(
        "displayName",
        display_name,
        limits.user_display_name_min,
        limits.user_display_name_max,
    )?;
    validate::length("role", role, limits.user_role_min, limits.user_role_max)?;
    validate::max_length("location", location, limits.user_location_max)?;
    Ok(())
}

fn check_unique(
    state: &StoreState,
    this: Option<&UserId>,
    email: &str,
    display_name: &str,
) -> StoreResult<()> {
    for other in state.users.iter().filter(|u| Some(&u.id) != this) {
        if other.email == email {
            return Err(StoreError::conflict(EntityKind::User, "email", email));
        }
        if other.display_name == display_name {
            return Err(StoreError::conflict(EntityKind::User, "displayName", display_name));
        }
    }
    Ok(())
}

/// Resolves the manager and subordinate references of `this`.
fn resolve_hierarchy(
    state: &StoreState,
    this: Option<&UserId>,
    manager: Option<&UserId>,
    subordinates: &[UserId],
) -> StoreResult<(Option<UserId>, Vec<UserId>)> {
    let manager = match manager {
        Some(m) => resolve_users(state, "manager", std::slice::from_ref(m), this)?
            .into_iter()
            .next(),
        None => None,
    };
    let subordinates = resolve_users(state, "subordinates", subordinates, this)?;
    if let Some(m) = &manager {
        if subordinates.contains(m) {
            return Err(StoreError::invalid_reference(
                "manager",
                m.as_str(),
                "manager is also listed as a subordinate",
            ));
        }
    }
    Ok((manager, subordinates))
}

/// Mirrors `id`'s manager change on the old and new managers.
fn relink_manager(state: &mut StoreState, id: &UserId, old: Option<&UserId>, new: Option<&UserId>) {
    if old == new {
        return;
    }
    if let Some(old) = old {
        state.modify_user(old, |m| m.subordinates.retain(|s| s != id));
    }
    if let Some(new) = new {
        state.modify_user(new, |m| {
            if !m.subordinates.contains(id) {
                m.subordinates.push(id.clone());
            }
        });
    }
}

/// Makes `id` the manager of each of `added`, detaching them from their
/// previous managers, and clears the manager of each of `removed`.
fn relink_subordinates(state: &mut StoreState, id: &UserId, added: &[UserId], removed: &[UserId]) {
    for sub in removed {
        state.modify_user(sub, |s| {
            if s.manager.as_ref() == Some(id) {
                s.manager = None;
            }
        });
    }
    for sub in added {
        let previous = state.user(sub).and_then(|s| s.manager.clone());
        if let Some(previous) = previous.filter(|p| p != id) {
            state.modify_user(&previous, |m| m.subordinates.retain(|s| s != sub));
        }
        state.modify_user(sub, |s| s.manager = Some(id.clone()));
    }
}

pub(crate) fn create_user(
    state: &mut StoreState,
    _caller: &dyn AccessControl,
    input: NewUser,
    limits: &FieldLimits,
) -> StoreResult<Arc<User>> {
    validate_fields(
        limits,
        &input.email,
        &input.display_name,
        &input.role,
        &input.location,
    )?;
    check_unique(state, None, &input.email, &input.display_name)?;
    let (manager, subordinates) =
        resolve_hierarchy(state, None, input.manager.as_ref(), &input.subordinates)?;

    let id = UserId::new(allocate_id(UserId::PREFIX, &input.display_name, |c| {
        state.user_id_taken(c)
    }));
    let user = Arc::new(User {
        id: id.clone(),
        email: input.email,
        display_name: input.display_name,
        role: input.role,
        location: input.location,
        personal_status: String::new(),
        password_hash: input.password_hash,
        manager: manager.clone(),
        subordinates: subordinates.clone(),
    });
    state.users.push(Arc::clone(&user));

    relink_manager(state, &id, None, manager.as_ref());
    relink_subordinates(state, &id, &subordinates, &[]);

    info!(user_id = %id, "user created");
    Ok(user)
}

pub(crate) fn update_user(
    state: &mut StoreState,
    caller: &dyn AccessControl,
    input: UserUpdate,
    limits: &FieldLimits,
) -> StoreResult<Arc<User>> {
    caller.require_owner(input.id.as_str())?;

    let current = state
        .user(&input.id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(EntityKind::User, "id", input.id.as_str()))?;

    validate_fields(
        limits,
        &input.email,
        &input.display_name,
        &input.role,
        &input.location,
    )?;
    if let Some(status) = &input.personal_status {
        validate::max_length("personalStatus", status, limits.user_personal_status_max)?;
    }
    check_unique(state, Some(&current.id), &input.email, &input.display_name)?;
    let (manager, subordinates) = resolve_hierarchy(
        state,
        Some(&current.id),
        input.manager.as_ref(),
        &input.subordinates,
    )?;

    let id = current.id.clone();
    let added: Vec<UserId> = subordinates
        .iter()
        .filter(|s| !current.subordinates.contains(s))
        .cloned()
        .collect();
    let removed: Vec<UserId> = current
        .subordinates
        .iter()
        .filter(|s| !subordinates.contains(s))
        .cloned()
        .collect();

    state.modify_user(&id, |u| {
        u.email = input.email;
        u.display_name = input.display_name;
        u.role = input.role;
        u.location = input.location;
        u.personal_status = input.personal_status.unwrap_or_default();
        u.manager = manager.clone();
        u.subordinates = subordinates;
    });
    relink_manager(state, &id, current.manager.as_ref(), manager.as_ref());
    relink_subordinates(state, &id, &added, &removed);

    info!(user_id = %id, "user updated");
    state
        .user(&id)
        .cloned()
        .ok_or_else(|| StoreError::internal(format!("user {id} vanished during update")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::{Bootstrap, Caller};
    use crate::error::ValidationError;
    use crate::mutation::fixtures::{new_user, seeded};

    fn update_of(user: &User) -> UserUpdate {
        UserUpdate {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            location: user.location.clone(),
            personal_status: Some(user.personal_status.clone()),
            manager: user.manager.clone(),
            subordinates: user.subordinates.clone(),
        }
    }

    fn get(state: &StoreState, id: &UserId) -> Arc<User> {
        Arc::clone(state.user(id).unwrap())
    }

    #[test]
    fn create_assigns_slug_id_and_links_hierarchy() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let mut input = new_user("Pam Beesly");
        input.manager = Some(users[0].clone());
        input.subordinates = vec![users[2].clone(), users[2].clone()];

        let pam = create_user(&mut state, &Bootstrap, input, &limits).unwrap();
        assert_eq!(pam.id.as_str(), "user_pam_beesly");
        assert_eq!(pam.subordinates, vec![users[2].clone()]);
        assert!(get(&state, &users[0]).manages(&pam.id));
        assert_eq!(get(&state, &users[2]).manager.as_ref(), Some(&pam.id));
    }

    #[test]
    fn create_rejects_duplicates_and_bad_fields() {
        let (mut state, _, _) = seeded();
        let limits = FieldLimits::default();
        let before = state.users.clone();

        let mut dup = new_user("Someone Else");
        dup.email = "ryan.lindsey@taskhub.io".to_string();
        let err = create_user(&mut state, &Bootstrap, dup, &limits).unwrap_err();
        assert_eq!(err, StoreError::conflict(EntityKind::User, "email", "ryan.lindsey@taskhub.io"));

        let err = create_user(&mut state, &Bootstrap, new_user("Ryan Lindsey"), &limits).unwrap_err();
        assert!(err.is_conflict());

        let mut bad = new_user("Kevin Malone");
        bad.email = "kevin".to_string();
        let err = create_user(&mut state, &Bootstrap, bad, &limits).unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::MalformedEmail { .. })));

        let err = create_user(&mut state, &Bootstrap, new_user("Kev"), &limits).unwrap_err();
        assert!(err.is_validation());

        assert_eq!(state.users.len(), before.len());
        assert!(state.users.iter().zip(&before).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn update_requires_owner_before_anything_else() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let mut upd = update_of(&get(&state, &users[0]));
        upd.email = "not-an-email".to_string();

        let err = update_user(&mut state, &Caller::anonymous(), upd.clone(), &limits).unwrap_err();
        assert_eq!(err, StoreError::Unauthenticated);
        let err = update_user(&mut state, &Caller::user(users[1].as_str()), upd, &limits).unwrap_err();
        assert_eq!(err, StoreError::Unauthorized);
    }

    #[test]
    fn noop_update_succeeds_and_missing_status_clears_it() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let caller = Caller::user(users[0].as_str());

        let mut upd = update_of(&get(&state, &users[0]));
        upd.personal_status = Some("on vacation".to_string());
        update_user(&mut state, &caller, upd, &limits).unwrap();

        let again = update_of(&get(&state, &users[0]));
        let out = update_user(&mut state, &caller, again, &limits).unwrap();
        assert_eq!(out.personal_status, "on vacation");
        assert_eq!(out.email, "ryan.lindsey@taskhub.io");

        let mut cleared = update_of(&out);
        cleared.personal_status = None;
        let out = update_user(&mut state, &caller, cleared, &limits).unwrap();
        assert_eq!(out.personal_status, "");
        assert_eq!(get(&state, &users[0]).personal_status, "");
    }

    #[test]
    fn self_as_manager_is_invalid_and_changes_nothing() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let before = get(&state, &users[0]);

        let mut upd = update_of(&before);
        upd.manager = Some(users[0].clone());
        let err = update_user(&mut state, &Caller::user(users[0].as_str()), upd, &limits).unwrap_err();
        assert!(err.is_invalid_reference());

        let mut upd = update_of(&before);
        upd.subordinates = vec![users[1].clone(), users[0].clone()];
        let err = update_user(&mut state, &Caller::user(users[0].as_str()), upd, &limits).unwrap_err();
        assert!(err.is_invalid_reference());

        let mut upd = update_of(&before);
        upd.manager = Some(users[1].clone());
        upd.subordinates = vec![users[1].clone()];
        let err = update_user(&mut state, &Caller::user(users[0].as_str()), upd, &limits).unwrap_err();
        assert!(err.is_invalid_reference());

        assert!(Arc::ptr_eq(&before, &get(&state, &users[0])));
        assert!(get(&state, &users[1]).manager.is_none());
    }

    #[test]
    fn manager_changes_are_mirrored() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let (ryan, anne, oscar) = (&users[0], &users[1], &users[2]);

        // Oscar reports to Ryan.
        let mut upd = update_of(&get(&state, oscar));
        upd.manager = Some(ryan.clone());
        update_user(&mut state, &Caller::user(oscar.as_str()), upd, &limits).unwrap();
        assert_eq!(get(&state, ryan).subordinates, vec![oscar.clone()]);

        // Anne claims Oscar; Ryan loses him.
        let mut upd = update_of(&get(&state, anne));
        upd.subordinates = vec![oscar.clone()];
        update_user(&mut state, &Caller::user(anne.as_str()), upd, &limits).unwrap();
        assert_eq!(get(&state, oscar).manager.as_ref(), Some(anne));
        assert!(get(&state, ryan).subordinates.is_empty());
        assert_eq!(get(&state, anne).subordinates, vec![oscar.clone()]);

        // Anne drops Oscar; he has no manager anymore.
        let mut upd = update_of(&get(&state, anne));
        upd.subordinates.clear();
        update_user(&mut state, &Caller::user(anne.as_str()), upd, &limits).unwrap();
        assert!(get(&state, oscar).manager.is_none());
    }

    #[test]
    fn unknown_subordinate_fails_atomically() {
        let (mut state, users, _) = seeded();
        let limits = FieldLimits::default();
        let before: Vec<_> = state.users.clone();

        let mut upd = update_of(&get(&state, &users[0]));
        upd.subordinates = vec![users[1].clone(), UserId::new("user_ghost")];
        upd.role = "Director".to_string();
        let err = update_user(&mut state, &Caller::user(users[0].as_str()), upd, &limits).unwrap_err();
        assert_eq!(err, StoreError::not_found(EntityKind::User, "subordinates", "user_ghost"));
        assert!(state.users.iter().zip(&before).all(|(a, b)| Arc::ptr_eq(a, b)));
    }
}

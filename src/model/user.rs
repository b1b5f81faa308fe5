//! User records.

use serde::{Deserialize, Serialize};

use super::UserId;

/// An identity record.
///
/// `manager` and `subordinates` are id references into the same store; the
/// mutation path keeps them mirrored (if `a.manager == Some(b.id)` then
/// `b.subordinates` contains `a.id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier assigned at creation.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// Unique display name.
    pub display_name: String,
    /// Job role.
    pub role: String,
    /// Free-form location.
    pub location: String,
    /// Free-text personal status; empty when unset.
    #[serde(default)]
    pub personal_status: String,
    /// Credential hash produced by the layer above the store.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Line manager, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<UserId>,
    /// Direct reports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subordinates: Vec<UserId>,
}

impl User {
    /// Returns true if `id` is one of this user's direct reports.
    #[must_use]
    pub fn manages(&self, id: &UserId) -> bool {
        self.subordinates.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let u = User {
            id: UserId::new("user_a"),
            email: "a@example.com".to_string(),
            display_name: "Alma".to_string(),
            role: "SWE Frontend".to_string(),
            location: String::new(),
            personal_status: String::new(),
            password_hash: "$2b$secret".to_string(),
            manager: None,
            subordinates: vec![UserId::new("user_b")],
        };
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("displayName"));
        assert!(u.manages(&UserId::new("user_b")));
    }
}

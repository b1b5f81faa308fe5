//! Typed entity identifiers.
//!
//! Ids are strings derived from the entity's name at creation time
//! (`task_implement_database_migration`) and never change afterwards.
//! Wrapping them per entity kind keeps a `UserId` from being passed where a
//! `TaskId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix of every generated id of this kind.
            pub const PREFIX: &'static str = $prefix;

            /// Wraps an existing id string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Stable user identifier.
    UserId,
    "user"
);
string_id!(
    /// Stable project identifier.
    ProjectId,
    "project"
);
string_id!(
    /// Stable task identifier.
    TaskId,
    "task"
);

/// Derives the id body from a name: trims, joins whitespace runs with `_`
/// and lower-cases the result.
///
/// # Examples
///
/// ```
/// use taskhub::model::slugify;
///
/// assert_eq!(slugify("  Implement database   migration "), "implement_database_migration");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Builds `<prefix>_<slug>`, appending `_2`, `_3`, ... while `taken` reports
/// the candidate as already in use.
pub(crate) fn allocate_id(prefix: &str, name: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{prefix}_{}", slugify(name));
    if !taken(&base) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

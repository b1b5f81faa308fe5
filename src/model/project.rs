//! Project records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProjectId, UserId};

/// A project that tasks are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable identifier assigned at creation.
    pub id: ProjectId,
    /// Unique project name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unique short code, e.g. `CORM`.
    pub slug: String,
    /// Creation timestamp supplied by the caller.
    pub creation: DateTime<Utc>,
    /// Owning users.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<UserId>,
}

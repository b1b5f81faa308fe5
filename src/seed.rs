//! Bulk datasets for bootstrapping a store.
//!
//! A dataset is applied in order (users, then projects, then tasks) through
//! the regular mutation paths, so later records may reference the derived ids
//! of earlier ones (`user_ryan_lindsey`, `project_core_migration`, ...).
//!
//! ```
//! use taskhub::seed::SeedData;
//!
//! let data = SeedData::from_json_str(r#"{
//!     "users": [{
//!         "email": "ryan.lindsey@taskhub.io",
//!         "passwordHash": "$2b$10$x",
//!         "displayName": "Ryan Lindsey",
//!         "role": "Engineering Manager"
//!     }],
//!     "projects": [{ "name": "Core Migration", "slug": "CORM", "owners": ["user_ryan_lindsey"] }]
//! }"#).unwrap();
//! assert_eq!(data.users.len(), 1);
//! assert!(data.tasks.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::mutation::{NewProject, NewTask, NewUser};

/// Records to import, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedData {
    /// Users, created first.
    pub users: Vec<NewUser>,
    /// Projects, created after all users.
    pub projects: Vec<NewProject>,
    /// Tasks, created last.
    pub tasks: Vec<NewTask>,
}

impl SeedData {
    /// Parses a JSON dataset.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MalformedSeed` if the document does not
    /// describe a dataset.
    pub fn from_json_str(s: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(s).map_err(|e| ValidationError::MalformedSeed {
            reason: e.to_string(),
        })
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len() + self.projects.len() + self.tasks.len()
    }

    /// Returns true if the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

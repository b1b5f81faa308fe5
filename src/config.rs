//! Store configuration.
//!
//! Every section has defaults, so an empty JSON object (or no config at all)
//! yields a working store.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Top-level configuration for an [`InMemoryStore`](crate::storage::InMemoryStore).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Change-notification buffering.
    pub notifications: NotificationConfig,
    /// Field length limits enforced by the mutation engine.
    pub limits: FieldLimits,
}

impl StoreConfig {
    /// Parses a JSON document; missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidConfig` if the document is not valid
    /// JSON or has a field of the wrong type.
    pub fn from_json_str(s: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(s).map_err(|e| ValidationError::InvalidConfig {
            reason: e.to_string(),
        })
    }
}

/// Per-subscriber buffering for change notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Events buffered per subscriber before further events are dropped for
    /// that subscriber. Clamped to at least 1.
    pub subscriber_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: 64,
        }
    }
}

/// Inclusive length bounds (in bytes) for user-supplied text fields.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    pub user_display_name_min: usize,
    pub user_display_name_max: usize,
    pub user_role_min: usize,
    pub user_role_max: usize,
    pub user_location_max: usize,
    pub user_personal_status_max: usize,
    pub project_name_min: usize,
    pub project_name_max: usize,
    pub project_description_max: usize,
    pub project_slug_max: usize,
    pub task_title_min: usize,
    pub task_title_max: usize,
    pub task_description_max: usize,
    pub task_tag_min: usize,
    pub task_tag_max: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            user_display_name_min: 4,
            user_display_name_max: 256,
            user_role_min: 4,
            user_role_max: 1024,
            user_location_max: 1024,
            user_personal_status_max: 64 * 1024,
            project_name_min: 4,
            project_name_max: 256,
            project_description_max: 64 * 1024,
            project_slug_max: 6,
            task_title_min: 1,
            task_title_max: 1024,
            task_description_max: 64 * 1024,
            task_tag_min: 1,
            task_tag_max: 1024,
        }
    }
}

//! Error types for taskhub.
//!
//! All errors are strongly typed using thiserror so callers can match on the
//! specific condition (missing entity, uniqueness violation, rejected caller)
//! and report it verbatim. None of them are fatal to the store: a failed
//! mutation leaves the state untouched.

use thiserror::Error;

use crate::model::EntityKind;

/// Field-level validation errors raised before any lookup is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A string is below its minimum length.
    #[error("Field '{field}' is shorter than the minimum length of {min_length}")]
    FieldTooShort {
        /// Wire name of the field.
        field: String,
        /// Smallest accepted length in characters.
        min_length: usize,
    },

    /// A string is above its maximum length.
    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        /// Wire name of the field.
        field: String,
        /// Largest accepted length in characters.
        max_length: usize,
    },

    /// An email address does not look like one.
    #[error("Malformed email address: {value}")]
    MalformedEmail {
        /// The rejected address.
        value: String,
    },

    /// A configuration document could not be parsed.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Parser message.
        reason: String,
    },

    /// A seed dataset could not be parsed.
    #[error("Malformed seed data: {reason}")]
    MalformedSeed {
        /// Parser message.
        reason: String,
    },
}

/// Top-level error type returned by every store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A looked-up id or a referenced id does not resolve.
    #[error("{kind} not found ({field}): {id}")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Field the id was supplied through.
        field: String,
        /// The unresolved id.
        id: String,
    },

    /// A unique field collides with a different entity of the same kind.
    #[error("Non-unique {kind} {field}: {value}")]
    Conflict {
        /// Kind of the entity being written.
        kind: EntityKind,
        /// The unique field.
        field: String,
        /// The colliding value.
        value: String,
    },

    /// A reference that resolves but is not allowed (e.g. self-reference).
    #[error("Invalid reference in '{field}' to {id}: {reason}")]
    InvalidReference {
        /// Field holding the reference.
        field: String,
        /// The referenced id.
        id: String,
        /// Why it is rejected.
        reason: String,
    },

    /// The caller carries no identity.
    #[error("unauthenticated")]
    Unauthenticated,

    /// The caller may not touch this entity.
    #[error("unauthorized")]
    Unauthorized,

    /// A field failed its shape check.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The store could not complete the operation, e.g. a poisoned lock.
    #[error("Internal error: {message}")]
    Internal {
        /// Diagnostic text.
        message: String,
    },
}

impl StoreError {
    /// Creates a not-found error for `id` referenced through `field`.
    #[must_use]
    pub fn not_found(kind: EntityKind, field: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            field: field.into(),
            id: id.into(),
        }
    }

    /// Creates a uniqueness conflict on `field`.
    #[must_use]
    pub fn conflict(kind: EntityKind, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid-reference error.
    #[must_use]
    pub fn invalid_reference(
        field: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidReference {
            field: field.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a uniqueness conflict.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true if this is an invalid reference.
    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference { .. })
    }

    /// Returns true if the caller was rejected (unauthenticated or unauthorized).
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Unauthorized)
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

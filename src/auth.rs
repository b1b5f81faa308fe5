//! Caller identity checks used to gate mutations.
//!
//! The store never authenticates anyone itself: the transport layer resolves
//! the caller (e.g. from a bearer token) and hands the store an
//! [`AccessControl`] implementation.

use crate::error::{StoreError, StoreResult};

/// Identity-check capability consumed by the mutation engine.
pub trait AccessControl: Send + Sync {
    /// Succeeds if the caller is authenticated, otherwise
    /// `StoreError::Unauthenticated`.
    fn require_authenticated(&self) -> StoreResult<()>;

    /// Succeeds if the caller is authenticated and is `owner_id`.
    ///
    /// Returns `Unauthenticated` for anonymous callers and `Unauthorized` for
    /// any other identity.
    fn require_owner(&self, owner_id: &str) -> StoreResult<()>;
}

/// The caller of a store operation: an opaque user id, or nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    user_id: Option<String>,
}

impl Caller {
    /// An unauthenticated caller.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// A caller authenticated as `user_id`. An empty id is anonymous.
    #[must_use]
    pub fn user(user_id: impl Into<String>) -> Self {
        let id = user_id.into();
        Self {
            user_id: (!id.is_empty()).then_some(id),
        }
    }

    /// The authenticated user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl AccessControl for Caller {
    fn require_authenticated(&self) -> StoreResult<()> {
        match self.user_id {
            Some(_) => Ok(()),
            None => Err(StoreError::Unauthenticated),
        }
    }

    fn require_owner(&self, owner_id: &str) -> StoreResult<()> {
        match self.user_id.as_deref() {
            None => Err(StoreError::Unauthenticated),
            Some(id) if id == owner_id => Ok(()),
            Some(_) => Err(StoreError::Unauthorized),
        }
    }
}

/// Grants everything. Used for bulk imports performed by the process itself.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Bootstrap;

impl AccessControl for Bootstrap {
    fn require_authenticated(&self) -> StoreResult<()> {
        Ok(())
    }

    fn require_owner(&self, _owner_id: &str) -> StoreResult<()> {
        Ok(())
    }
}

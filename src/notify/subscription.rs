use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of one subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure to receive an event from a [`Subscription`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecvError {
    /// No event arrived within the timeout.
    #[error("no event within {duration_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        duration_ms: u64,
    },

    /// No event is buffered right now.
    #[error("no event buffered")]
    Empty,

    /// The broadcaster is gone and the buffer is drained.
    #[error("subscription disconnected")]
    Disconnected,
}

pub(super) type Registry<T> = RwLock<HashMap<SubscriptionId, Sender<T>>>;

/// Receiving end of one subscriber.
///
/// Dropping the subscription unregisters it.
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: Receiver<T>,
    registry: Arc<Registry<T>>,
    unregistered: AtomicBool,
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("buffered", &self.rx.len())
            .finish_non_exhaustive()
    }
}

impl<T> Subscription<T> {
    pub(super) fn new(id: SubscriptionId, rx: Receiver<T>, registry: Arc<Registry<T>>) -> Self {
        Self {
            id,
            rx,
            registry,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Number of events waiting in the buffer.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.rx.len()
    }

    /// Removes this subscriber from the broadcaster. Idempotent.
    ///
    /// Events already buffered can still be received afterwards.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut subscribers = match self.registry.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.remove(&self.id);
    }

    /// Receive the next event (blocking).
    ///
    /// # Errors
    ///
    /// `RecvError::Disconnected` once unsubscribed (or the broadcaster is
    /// dropped) and the buffer is empty.
    pub fn recv(&self) -> Result<T, RecvError> {
        self.rx.recv().map_err(|_| RecvError::Disconnected)
    }

    /// Receive a buffered event without blocking.
    ///
    /// # Errors
    ///
    /// `RecvError::Empty` if nothing is buffered, `Disconnected` as for
    /// [`recv`](Self::recv).
    pub fn try_recv(&self) -> Result<T, RecvError> {
        self.rx.try_recv().map_err(|err| match err {
            TryRecvError::Empty => RecvError::Empty,
            TryRecvError::Disconnected => RecvError::Disconnected,
        })
    }

    /// Receive the next event with a timeout.
    ///
    /// # Errors
    ///
    /// `RecvError::Timeout` if the timeout elapses, `Disconnected` as for
    /// [`recv`](Self::recv).
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvError> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => RecvError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            },
            RecvTimeoutError::Disconnected => RecvError::Disconnected,
        })
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

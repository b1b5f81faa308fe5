use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crossbeam_channel::{bounded, TrySendError};
use tracing::{debug, warn};

use super::subscription::{Registry, Subscription, SubscriptionId};

/// Fan-out of events of one type to any number of subscribers.
///
/// Each subscriber gets its own bounded buffer. Publishing never blocks: an
/// event that does not fit a subscriber's buffer is dropped for that
/// subscriber only and counted.
pub struct Broadcaster<T> {
    capacity: usize,
    subscribers: Arc<Registry<T>>,
    dropped: AtomicU64,
}

impl<T> fmt::Debug for Broadcaster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.subscriber_count())
            .field("dropped", &self.dropped_events())
            .finish()
    }
}

impl<T: Clone + Send> Broadcaster<T> {
    /// Creates a broadcaster whose subscribers buffer up to `capacity` events
    /// (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            dropped: AtomicU64::new(0),
        }
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription<T> {
        let id = SubscriptionId::new();
        let (tx, rx) = bounded(self.capacity);
        let mut subscribers = match self.subscribers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.insert(id, tx);
        debug!(subscription_id = %id, "subscriber registered");
        Subscription::new(id, rx, Arc::clone(&self.subscribers))
    }

    /// Offers `event` to every subscriber without blocking.
    ///
    /// Returns the number of subscribers that accepted it. Subscribers whose
    /// receiving end is gone are pruned.
    pub fn publish(&self, event: &T) -> usize {
        let mut delivered = 0usize;
        let mut gone = Vec::new();
        {
            let subscribers = match self.subscribers.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            for (id, tx) in subscribers.iter() {
                match tx.try_send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        warn!(subscription_id = %id, dropped_total = total, "subscriber buffer full, event dropped");
                    }
                    Err(TrySendError::Disconnected(_)) => gone.push(*id),
                }
            }
        }

        if !gone.is_empty() {
            let mut subscribers = match self.subscribers.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            for id in &gone {
                subscribers.remove(id);
            }
            debug!(pruned = gone.len(), "disconnected subscribers pruned");
        }
        delivered
    }
}

impl<T> Broadcaster<T> {
    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Events dropped so far because a subscriber's buffer was full.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

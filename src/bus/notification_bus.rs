//! Typed in-process fan-out for one notification type.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::Notification;

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    listeners: RwLock<HashMap<u64, Callback<E>>>,
    next_id: AtomicU64,
}

/// Delivers each published event to every subscriber registered at the
/// moment of publication, once per subscriber.
///
/// There is no queue and no history: publishing with no subscribers drops
/// the event. Delivery order across subscribers is unspecified.
///
/// ## Example
///
/// ```
/// use mediator_rust::bus::{Notification, NotificationBus};
///
/// #[derive(Clone, Debug)]
/// struct Changed(u32);
/// impl Notification for Changed {}
///
/// let bus = NotificationBus::<Changed>::new();
/// let (subscription, mut rx) = bus.subscribe_channel();
///
/// assert_eq!(bus.publish(Changed(1)), 1);
/// assert_eq!(rx.try_recv().unwrap().0, 1);
///
/// drop(subscription);
/// assert_eq!(bus.publish(Changed(2)), 0);
/// ```
pub struct NotificationBus<E> {
    registry: Arc<Registry<E>>,
}

impl<E> Clone for NotificationBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: Notification> Default for NotificationBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Notification> NotificationBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                listeners: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a callback. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    ///
    /// Callbacks run on the publishing task and must not block.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .listeners
            .write()
            .insert(id, Arc::new(callback));
        tracing::debug!(subscriber = id, event = E::name(), "subscriber registered");

        let registry: Weak<Registry<E>> = Arc::downgrade(&self.registry);
        Subscription::new(id, move |id| {
            if let Some(registry) = registry.upgrade() {
                registry.listeners.write().remove(&id);
                tracing::debug!(subscriber = id, event = E::name(), "subscriber removed");
            }
        })
    }

    /// Register a subscriber that forwards events into a channel, for
    /// observers that consume events from their own task.
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |event: &E| {
            // A closed receiver means the observer is going away; its
            // subscription is dropped with it.
            let _ = tx.send(event.clone());
        });
        (subscription, rx)
    }

    /// Deliver `event` to every current subscriber. Returns how many were reached.
    pub fn publish(&self, event: E) -> usize {
        // Snapshot under the read lock, invoke outside it, so callbacks may
        // subscribe or unsubscribe without deadlocking.
        let listeners: Vec<Callback<E>> =
            self.registry.listeners.read().values().cloned().collect();

        if listeners.is_empty() {
            tracing::trace!(event = E::name(), "no subscribers; event dropped");
            return 0;
        }

        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.listeners.read().len()
    }
}

/// Handle for a registered subscriber. Dropping it deregisters the subscriber.
#[must_use = "dropping a Subscription deregisters the subscriber immediately"]
pub struct Subscription {
    id: u64,
    remove: Option<Box<dyn FnOnce(u64) + Send + Sync>>,
}

impl Subscription {
    fn new<F>(id: u64, remove: F) -> Self
    where
        F: FnOnce(u64) + Send + Sync + 'static,
    {
        Self {
            id,
            remove: Some(Box::new(remove)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Deregister now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

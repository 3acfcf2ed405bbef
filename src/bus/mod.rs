//! Notification bus: in-process publish/subscribe for domain events.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              Notifications (one per process)             │
//! │  - one NotificationBus<E> per event type, created lazily │
//! │  - publish(event) / subscribe(callback)                  │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                   NotificationBus<E>                      │
//! │  - subscriber set behind a narrow RwLock                 │
//! │  - publish snapshots subscribers, then calls each once   │
//! │  - Subscription handle deregisters on drop               │
//! └──────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌─────────────────┐              ┌──────────────────────────┐
//! │ plain callback  │              │ stream::observe          │
//! │ (Fn(&E))        │              │ (channel → "data:" frames)│
//! └─────────────────┘              └──────────────────────────┘
//! ```
//!
//! Delivery is at-most-once and live only: nothing is queued for
//! subscribers that register later.

mod notification_bus;
pub mod stream;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

pub use notification_bus::{NotificationBus, Subscription};

/// An event that can be published on the bus.
pub trait Notification: Clone + Send + Sync + 'static {
    /// Name used in logs. Defaults to the unqualified type name.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Process-wide hub holding one [`NotificationBus`] per event type.
///
/// Cheap to clone; every clone shares the same buses. Its identity never
/// changes after construction, only the subscriber sets do.
#[derive(Clone, Default)]
pub struct Notifications {
    buses: Arc<RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bus for `E`, created on first use.
    pub fn bus<E: Notification>(&self) -> NotificationBus<E> {
        if let Some(bus) = self.existing::<E>() {
            return bus;
        }
        self.buses
            .write()
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(NotificationBus::<E>::new()))
            .downcast_ref::<NotificationBus<E>>()
            .cloned()
            .unwrap_or_default()
    }

    pub fn subscribe<E, F>(&self, callback: F) -> Subscription
    where
        E: Notification,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.bus::<E>().subscribe(callback)
    }

    pub fn subscribe_channel<E: Notification>(
        &self,
    ) -> (Subscription, mpsc::UnboundedReceiver<E>) {
        self.bus::<E>().subscribe_channel()
    }

    /// Publish `event` to the current subscribers of its type.
    ///
    /// Returns the number reached; zero when nobody has subscribed yet.
    pub fn publish<E: Notification>(&self, event: E) -> usize {
        match self.existing::<E>() {
            Some(bus) => bus.publish(event),
            None => 0,
        }
    }

    pub fn subscriber_count<E: Notification>(&self) -> usize {
        self.existing::<E>()
            .map(|bus| bus.subscriber_count())
            .unwrap_or(0)
    }

    fn existing<E: Notification>(&self) -> Option<NotificationBus<E>> {
        self.buses
            .read()
            .get(&TypeId::of::<E>())
            .and_then(|bus| bus.downcast_ref::<NotificationBus<E>>())
            .cloned()
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Observer registry for collection change notifications.
//!
//! Callbacks are snapshotted before each notification, so a callback may
//! subscribe or unsubscribe (itself or others) while being notified. A
//! panicking callback does not stop the others from being called.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::warn;

/// A unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback invoked with the current value.
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T: ?Sized> {
    observers: Mutex<BTreeMap<SubscriptionId, Observer<T>>>,
    next_id: AtomicU64,
}

impl<T: ?Sized> Registry<T> {
    fn lock(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, Observer<T>>> {
        self.observers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Thread-safe publish/subscribe registry.
///
/// Observers are called in subscription order.
pub struct ObserverRegistry<T: ?Sized> {
    inner: Arc<Registry<T>>,
}

impl<T: ?Sized> ObserverRegistry<T> {
    pub fn new() -> Self {
        ObserverRegistry {
            inner: Arc::new(Registry {
                observers: Mutex::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers `observer` and returns a handle that removes it again.
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.lock().insert(id, observer);
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Removes an observer by id. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.lock().remove(&id).is_some()
    }

    /// Calls every observer registered at the time of the call.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<(SubscriptionId, Observer<T>)> = self
            .inner
            .lock()
            .iter()
            .map(|(id, observer)| (*id, Arc::clone(observer)))
            .collect();

        for (id, observer) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer(value))).is_err() {
                warn!("Observer {} panicked during notification", id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<T: ?Sized> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscriber_count", &self.len())
            .finish()
    }
}

/// Handle for one registered observer.
///
/// Dropping the handle unsubscribes. Call [`Subscription::detach`] to keep
/// the observer for the registry's lifetime.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription<T: ?Sized> {
    id: SubscriptionId,
    registry: Weak<Registry<T>>,
}

impl<T: ?Sized> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the observer now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keeps the observer registered after this handle is gone.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl<T: ?Sized> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.id);
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;

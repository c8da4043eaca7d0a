//! Observable value holder with synchronous, ordered change notification.
//!
//! Every `set` counts as a write (see [`Observable::writes`]), but listeners
//! only run when the new value differs from the old one. Listeners receive a
//! shared reference to the new value and cannot reach the owner of the
//! observable, so a notification handler cannot re-enter the state it observes.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub type Listener<T> = Box<dyn FnMut(&T) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Slot<T> {
    id: ListenerId,
    /// `None` while the callback is running.
    callback: Option<Listener<T>>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
}

impl<T> Registry<T> {
    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }
}

fn lock<R>(m: &Mutex<R>) -> MutexGuard<'_, R> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Observable<T> {
    value: T,
    writes: u64,
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            writes: 0,
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Write `value`. Returns true (and notifies) only if it changed.
    pub fn set(&mut self, value: T) -> bool {
        self.writes += 1;
        if self.value == value {
            return false;
        }
        self.value = value;
        self.notify();
        true
    }

    /// Number of `set` calls so far, changed or not.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Register a listener. Listeners run in registration order.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let mut reg = lock(&self.registry);
        let id = ListenerId(reg.next_id);
        reg.next_id += 1;
        reg.slots.push(Slot {
            id,
            callback: Some(Box::new(listener)),
        });
        id
    }

    /// Remove a listener. Unknown or already removed ids are a no-op.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        lock(&self.registry).remove(id)
    }

    /// A handle that can unsubscribe listeners from inside a notification.
    pub fn handle(&self) -> ListenerHandle<T> {
        ListenerHandle {
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).slots.len()
    }

    fn notify(&self) {
        // Listeners added during this round are not called until the next one.
        let ids: Vec<ListenerId> = lock(&self.registry).slots.iter().map(|s| s.id).collect();
        for id in ids {
            let callback = {
                let mut reg = lock(&self.registry);
                reg.slots
                    .iter_mut()
                    .find(|s| s.id == id)
                    .and_then(|s| s.callback.take())
            };
            let Some(mut callback) = callback else {
                continue;
            };
            callback(&self.value);
            // The slot is gone if the listener was unsubscribed while running.
            let mut reg = lock(&self.registry);
            if let Some(slot) = reg.slots.iter_mut().find(|s| s.id == id) {
                slot.callback = Some(callback);
            }
        }
    }
}

impl<T: PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

pub struct ListenerHandle<T> {
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> ListenerHandle<T> {
    /// Remove a listener. A no-op once the observable is dropped.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        match self.registry.upgrade() {
            Some(registry) => lock(&registry).remove(id),
            None => false,
        }
    }
}

impl<T> Clone for ListenerHandle<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
        }
    }
}

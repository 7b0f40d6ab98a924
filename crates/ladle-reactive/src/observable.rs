#![forbid(unsafe_code)]

//! Shared, version-tracked value wrapper with change notification.
//!
//! [`Observable<T>`] is the single-threaded building block for reactive
//! state: a value behind `Rc<RefCell<..>>` that notifies registered
//! callbacks whenever it changes. Callbacks are held as `Weak` references;
//! the strong reference lives in the [`Subscription`] returned by
//! [`subscribe`](Observable::subscribe), so dropping the subscription is all
//! it takes to disconnect.
//!
//! # Invariants
//!
//! 1. `version()` increments exactly once per value-changing `set`.
//! 2. Subscribers are notified in registration order.
//! 3. `set` with a value equal to the current one is a no-op: no version
//!    bump, no notifications.
//! 4. A dropped [`Subscription`] never fires again; its slot is pruned
//!    lazily on the next notification cycle.
//! 5. A callback registered *during* a notification cycle does not fire in
//!    that same cycle.
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `set`; remaining callbacks
//!   in that cycle do not run.
//! - Callback calls `set` on the same observable: supported (the value
//!   borrow is released before callbacks run), but later callbacks in the
//!   outer cycle observe the nested cycle's value.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct Inner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<Weak<Callback<T>>>>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Cloning an `Observable` yields another handle to the same underlying
/// value; changes made through any handle are visible to all of them.
pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value`. Version starts at 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Read the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replace the value, bumping the version and notifying subscribers.
    ///
    /// Setting a value equal to the current one is a no-op.
    pub fn set(&self, value: T) {
        let changed = {
            let mut slot = self.inner.value.borrow_mut();
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        };
        if changed {
            self.inner.version.set(self.inner.version.get() + 1);
            self.notify();
        }
    }

    /// Monotonic change counter: number of value-changing `set` calls so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Register `callback` to run after every value change.
    ///
    /// The callback fires in registration order relative to other
    /// subscribers and receives a reference to the post-change value. It
    /// stays registered for as long as the returned [`Subscription`] lives.
    #[must_use = "dropping the Subscription immediately unsubscribes"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of live subscribers (dead slots are pruned first).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut subs = self.inner.subscribers.borrow_mut();
        subs.retain(|weak| weak.strong_count() > 0);
        subs.len()
    }

    fn notify(&self) {
        // Snapshot so callbacks may subscribe/unsubscribe without holding
        // the subscriber borrow across user code.
        let snapshot: Vec<Weak<Callback<T>>> = self.inner.subscribers.borrow().clone();
        let value = self.inner.value.borrow().clone();
        for weak in &snapshot {
            if let Some(callback) = weak.upgrade() {
                callback(&value);
            }
        }
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0);
    }
}

/// RAII guard for a registered callback.
///
/// The subscription owns the only strong reference to the callback; dropping
/// it disconnects the callback before the next notification cycle.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}

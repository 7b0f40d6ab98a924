#![forbid(unsafe_code)]

//! Reactive change-tracking primitives for ladle.
//!
//! This crate provides the notification machinery that keeps consumers in
//! sync with mutable application state:
//!
//! - [`Observable`]: A shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership. Subscribers are stored as `Weak` function pointers and cleaned
//! up lazily during notification. Nothing here is `Send` or `Sync`: a host
//! that moves observables across threads must wrap them in its own mutual
//! exclusion.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod observable;

pub use observable::{Observable, Subscription};

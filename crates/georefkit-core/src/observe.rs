//! Observer registry for transform-change notification.
//!
//! Replaces ambient signal connect/disconnect with an explicit list:
//! subscribers register a handler and get back a [`SubscriptionId`] they use
//! to unsubscribe. Notification runs the handlers synchronously, in
//! subscription order, on the calling (UI) thread — the engine has no
//! cross-thread state.

use std::fmt;

/// Subscription handle for unsubscribing from notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type Handler<T> = Box<dyn FnMut(&T)>;

/// An ordered list of observers for values of type `T`.
pub struct Observers<T> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<T>)>,
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Observers<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    /// Registers a handler and returns its subscription id.
    pub fn subscribe(&mut self, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Calls every handler with the given value, in subscription order.
    pub fn notify(&mut self, value: &T) {
        for (_, handler) in &mut self.handlers {
            handler(value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// Handlers are opaque closures; Debug shows only the count.
impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_notify() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<i32> = Observers::new();

        let sink = Rc::clone(&seen);
        observers.subscribe(move |v| sink.borrow_mut().push(*v));

        observers.notify(&1);
        observers.notify(&2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let seen = Rc::new(RefCell::new(0));
        let mut observers: Observers<i32> = Observers::new();

        let sink = Rc::clone(&seen);
        let id = observers.subscribe(move |_| *sink.borrow_mut() += 1);

        observers.notify(&0);
        assert!(observers.unsubscribe(id));
        observers.notify(&0);
        assert_eq!(*seen.borrow(), 1);
        // Second unsubscribe is a no-op
        assert!(!observers.unsubscribe(id));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut observers: Observers<()> = Observers::new();
        let a = observers.subscribe(|_| {});
        let b = observers.subscribe(|_| {});
        assert_ne!(a, b);
    }
}

//! Page-wide input listeners
//!
//! Some widgets react to input that lands outside their own surface (closing
//! a menu on an outside click, for example). They subscribe here instead of
//! intercepting events globally. Each subscription is a handle: dropping it
//! removes the listener, so a widget that keeps its handle until unmount can
//! never leak a listener.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Raw input observed by the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalSignal {
    /// A pointer press anywhere on the page
    PointerDown {
        column: u16,
        row: u16,
        viewport_width: u16,
    },
}

type Callback = Rc<dyn Fn(&GlobalSignal)>;

#[derive(Default)]
struct Hub {
    next_id: u64,
    listeners: Vec<(u64, Callback)>,
}

/// Handle to the page's listener hub; clones share the same hub
#[derive(Clone, Default)]
pub struct GlobalListeners {
    hub: Rc<RefCell<Hub>>,
}

impl fmt::Debug for GlobalListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalListeners")
            .field("listeners", &self.len())
            .finish()
    }
}

impl GlobalListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every dispatched signal
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&GlobalSignal) + 'static,
    {
        let mut hub = self.hub.borrow_mut();
        hub.next_id += 1;
        let id = hub.next_id;
        hub.listeners.push((id, Rc::new(callback)));
        tracing::trace!(id, total = hub.listeners.len(), "listener subscribed");

        Subscription {
            id,
            hub: Rc::downgrade(&self.hub),
        }
    }

    /// Deliver `signal` to every listener registered at the time of the call
    pub fn dispatch(&self, signal: &GlobalSignal) {
        let listeners: Vec<Callback> = self
            .hub
            .borrow()
            .listeners
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for listener in listeners {
            listener(signal);
        }
    }

    /// Number of live listeners
    pub fn len(&self) -> usize {
        self.hub.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration of one listener; dropping it deregisters the listener
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<Hub>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            let mut hub = hub.borrow_mut();
            hub.listeners.retain(|(id, _)| *id != self.id);
            tracing::trace!(id = self.id, total = hub.listeners.len(), "listener released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn press(column: u16) -> GlobalSignal {
        GlobalSignal::PointerDown {
            column,
            row: 0,
            viewport_width: 80,
        }
    }

    #[test]
    fn test_dispatch_reaches_subscribers() {
        let listeners = GlobalListeners::new();
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let _sub = listeners.subscribe(move |_| counter.set(counter.get() + 1));

        listeners.dispatch(&press(1));
        listeners.dispatch(&press(2));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_dropping_subscription_deregisters() {
        let listeners = GlobalListeners::new();
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let sub = listeners.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(listeners.len(), 1);

        drop(sub);
        assert!(listeners.is_empty());

        listeners.dispatch(&press(1));
        assert_eq!(seen.get(), 0);
    }

    #[test]
    fn test_subscription_outliving_hub_is_harmless() {
        let listeners = GlobalListeners::new();
        let sub = listeners.subscribe(|_| {});
        drop(listeners);
        drop(sub);
    }

    #[test]
    fn test_clones_share_one_hub() {
        let listeners = GlobalListeners::new();
        let other = listeners.clone();
        let _sub = other.subscribe(|_| {});
        assert_eq!(listeners.len(), 1);
    }
}

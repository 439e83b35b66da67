//! Event emitter
//!
//! Entities that publish events own an `EventEmitter` instead of inheriting
//! from a dispatcher type.

use std::fmt;

/// Handle returned by [`EventEmitter::on`], used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A list of listeners for events of type `E`
///
/// Listeners run synchronously in subscription order when an event is
/// triggered.
pub struct EventEmitter<E> {
    listeners: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventEmitter<E> {
    /// Create an emitter without listeners
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Subscribe a listener
    pub fn on(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unsubscribe a listener; returns false if it was not subscribed
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener
    pub fn trigger(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    /// Number of subscribed listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_receive_events_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::<u32>::new();

        let a = log.clone();
        emitter.on(move |e| a.borrow_mut().push(("a", *e)));
        let b = log.clone();
        emitter.on(move |e| b.borrow_mut().push(("b", *e)));

        emitter.trigger(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_off_unsubscribes() {
        let count = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::<()>::new();
        let c = count.clone();
        let id = emitter.on(move |_| *c.borrow_mut() += 1);

        emitter.trigger(&());
        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.trigger(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }
}

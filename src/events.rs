//! A small multi-subscriber observer list.
//!
//! Components that publish state changes (playback, queue) own an
//! `EventBus` and hand out `SubscriptionId`s. All subscribers see every
//! event, in subscription order.

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback signature: receives a borrowed event.
pub type EventCallback<E> = Box<dyn FnMut(&E) + 'static>;

pub struct EventBus<E> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, EventCallback<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays registered until `unsubscribe` is called.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn every_subscriber_sees_every_event_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<u32> = EventBus::new();

        let a = seen.clone();
        bus.subscribe(move |e| a.borrow_mut().push(("a", *e)));
        let b = seen.clone();
        bus.subscribe(move |e| b.borrow_mut().push(("b", *e)));

        bus.emit(&1);
        bus.emit(&2);

        assert_eq!(
            *seen.borrow(),
            vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]
        );
    }

    #[test]
    fn unsubscribe_only_removes_that_subscriber() {
        let count = Rc::new(RefCell::new(0));
        let mut bus: EventBus<()> = EventBus::new();

        let c1 = count.clone();
        let first = bus.subscribe(move |_| *c1.borrow_mut() += 1);
        let c2 = count.clone();
        bus.subscribe(move |_| *c2.borrow_mut() += 10);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert!(!bus.is_empty());

        bus.emit(&());
        assert_eq!(*count.borrow(), 10);
    }
}

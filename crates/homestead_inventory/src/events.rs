//! Inventory change notification
//!
//! Listeners subscribe once and are called synchronously after every
//! mutating call that changed state, in subscription order.

/// Inventory events
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    /// Items placed into a slot
    ItemAdded {
        slot: usize,
        item_id: String,
        quantity: u32,
    },
    /// Items taken from a slot
    ItemRemoved {
        slot: usize,
        item_id: String,
        quantity: u32,
    },
    /// Two slots exchanged contents
    SlotsSwapped { slot_a: usize, slot_b: usize },
    /// Selected slot changed
    SelectionChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    /// A tool in a slot lost durability
    DurabilityChanged {
        slot: usize,
        item_id: String,
        durability: f32,
    },
    /// Couldn't place everything
    Full { item_id: String, overflow: u32 },
}

/// Listener callback type
pub type InventoryListener = Box<dyn FnMut(&InventoryEvent) + Send>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Ordered list of listeners
#[derive(Default)]
pub(crate) struct ListenerList {
    listeners: Vec<(SubscriberId, InventoryListener)>,
    next_id: u64,
}

impl ListenerList {
    pub(crate) fn subscribe(&mut self, listener: InventoryListener) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub_id, _)| *sub_id != id);
        self.listeners.len() != before
    }

    pub(crate) fn dispatch(&mut self, events: &[InventoryEvent]) {
        for event in events {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_dispatch_in_subscription_order() {
        let mut list = ListenerList::default();
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = order.clone();
        let second = order.clone();

        list.subscribe(Box::new(move |_| first.lock().push("first")));
        list.subscribe(Box::new(move |_| second.lock().push("second")));

        list.dispatch(&[InventoryEvent::SlotsSwapped { slot_a: 0, slot_b: 1 }]);

        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut list = ListenerList::default();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();

        let id = list.subscribe(Box::new(move |_| *counter.lock() += 1));
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));

        list.dispatch(&[InventoryEvent::SlotsSwapped { slot_a: 0, slot_b: 1 }]);
        assert_eq!(*calls.lock(), 0);
        assert!(list.listeners.is_empty());
    }
}

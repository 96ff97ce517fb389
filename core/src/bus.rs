//! In-process publish/subscribe bus.
//!
//! RULES:
//!   - Delivery is synchronous, on the caller's thread, in subscription order.
//!   - publish() snapshots the handler list before delivering. Handlers may
//!     subscribe or unsubscribe during delivery; the change applies to the
//!     next publish, not the current one.
//!   - A failing handler is logged and skipped. Remaining handlers for the
//!     topic still run.
//!   - clear() is for session teardown only.
//!
//! The bus is shared as `Rc<EventBus>` so handlers can hold a reference and
//! manage their own subscriptions. All methods take `&self`.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use crate::event::BusEvent;

pub type Handler = Rc<dyn Fn(&BusEvent) -> anyhow::Result<()>>;

struct Entry {
    id:      u64,
    once:    bool,
    handler: Handler,
}

/// Handle returned by subscribe(). Pass to unsubscribe() or call cancel().
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    topic: String,
    id:    u64,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn cancel(&self, bus: &EventBus) -> bool {
        bus.unsubscribe(self)
    }
}

#[derive(Default)]
pub struct EventBus {
    topics:  RefCell<HashMap<String, Vec<Entry>>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.count_subscribers(None))
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    pub fn subscribe<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&BusEvent) -> anyhow::Result<()> + 'static,
    {
        self.insert(topic, Rc::new(handler), false)
    }

    /// Subscribe for a single delivery. The handler is removed before it runs.
    pub fn subscribe_once<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&BusEvent) -> anyhow::Result<()> + 'static,
    {
        self.insert(topic, Rc::new(handler), true)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.remove(&subscription.topic, subscription.id)
    }

    /// Deliver `event` to every handler subscribed to its topic.
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: &BusEvent) -> usize {
        let topic = event.topic();
        let snapshot: Vec<(u64, bool, Handler)> = {
            let topics = self.topics.borrow();
            match topics.get(topic) {
                Some(entries) => entries
                    .iter()
                    .map(|e| (e.id, e.once, Rc::clone(&e.handler)))
                    .collect(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        for (id, once, handler) in snapshot {
            if once {
                self.remove(topic, id);
            }
            if let Err(e) = handler(event) {
                log::error!("bus handler #{id} on '{topic}' failed: {e:#}");
            }
            delivered += 1;
        }
        delivered
    }

    pub fn clear(&self) {
        self.topics.borrow_mut().clear();
    }

    /// Handlers on `topic`, or across all topics when `None`.
    pub fn count_subscribers(&self, topic: Option<&str>) -> usize {
        let topics = self.topics.borrow();
        match topic {
            Some(t) => topics.get(t).map_or(0, Vec::len),
            None    => topics.values().map(Vec::len).sum(),
        }
    }

    fn insert(&self, topic: &str, handler: Handler, once: bool) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.topics
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push(Entry { id, once, handler });
        Subscription { topic: topic.to_string(), id }
    }

    fn remove(&self, topic: &str, id: u64) -> bool {
        let mut topics = self.topics.borrow_mut();
        let Some(entries) = topics.get_mut(topic) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            topics.remove(topic);
        }
        removed
    }
}

//! Process-wide change notification bus.
//!
//! Replaces the ambient global event of the original design with an explicit
//! observer abstraction: consumers subscribe on mount and must unsubscribe on
//! teardown using the returned id. Delivery is fire-and-forget to whoever is
//! subscribed at publish time; there is no queue and no guarantee.

use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Topic published after every successful save of the child collection.
pub const DATA_CHANGED_EVENT: &str = "health-tracker:data-changed";

/// Handle identifying one subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&str) + Send + Sync>;

struct BusInner {
    next_id: u64,
    subscribers: HashMap<SubscriptionId, (String, Callback)>,
}

/// Cloneable pub/sub bus. Clones share the same subscriber set.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                next_id: 0,
                subscribers: HashMap::new(),
            })),
        }
    }

    /// Register a callback for one topic. Keep the returned id and pass it to
    /// [`EventBus::unsubscribe`] on teardown.
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        inner
            .subscribers
            .insert(id, (topic.to_string(), Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false when the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.lock().unwrap().subscribers.remove(&id).is_some()
    }

    /// Invoke every callback subscribed to `topic`.
    pub fn publish(&self, topic: &str) {
        let inner = self.inner.lock().unwrap();
        let mut notified = 0usize;
        for (subscribed_topic, callback) in inner.subscribers.values() {
            if subscribed_topic == topic {
                callback(topic);
                notified += 1;
            }
        }
        debug!("Published {} to {} subscriber(s)", topic, notified);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

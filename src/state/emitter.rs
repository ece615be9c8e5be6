use std::fmt;

use showme_util::{Callback, EventKind, SubscriptionId, ToastEvent};

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    callback: Callback,
}

/// Per-toast event emitter with any number of subscribers per event kind
#[derive(Default)]
pub struct Emitter {
    subscribers: Vec<Subscriber>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, id: SubscriptionId, kind: EventKind, callback: Callback) {
        self.subscribers.push(Subscriber { id, kind, callback });
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every matching subscriber in subscription order.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&mut self, event: &ToastEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        for subscriber in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (subscriber.callback)(event);
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.subscribers.iter().map(|s| (s.id, s.kind)))
            .finish()
    }
}

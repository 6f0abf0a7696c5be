//! Typed event dispatcher for bus deliveries.
//!
//! Panels register callbacks against MQTT topic filters. The app drains the
//! transport channel once per UI frame and hands every delivery to
//! [`Dispatcher::dispatch`], which runs each matching callback to
//! completion in registration order.
//!
//! Callbacks typically hold a `Weak` handle to their panel state so that a
//! delivery arriving after the panel was dropped is a no-op; see
//! [`Dispatcher::subscribe_weak`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::bus::{topic_matches, Payload};

/// Identifier returned by [`Dispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&str, &[u8])>;

struct Subscription {
    id: SubscriptionId,
    filter: String,
    handler: Handler,
}

/// Routes `(topic, payload)` deliveries to registered callbacks.
#[derive(Default)]
pub struct Dispatcher {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    dropped: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw callback for every topic matching `filter`.
    pub fn subscribe<F>(&mut self, filter: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: FnMut(&str, &[u8]) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter: filter.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Register a callback receiving decoded messages of type `T`.
    ///
    /// Payloads that fail to decode are dropped before the callback runs.
    pub fn subscribe_typed<T, F>(&mut self, filter: impl Into<String>, mut handler: F) -> SubscriptionId
    where
        T: Payload + 'static,
        F: FnMut(&str, T) + 'static,
    {
        self.subscribe(filter, move |topic, payload| match T::decode(payload) {
            Ok(msg) => handler(topic, msg),
            Err(e) => log::debug!("Dropping malformed payload on {topic}: {e}"),
        })
    }

    /// Register a typed callback bound to shared state.
    ///
    /// The dispatcher only keeps a weak reference; once `state` is dropped
    /// the callback silently does nothing.
    pub fn subscribe_weak<S, T, F>(
        &mut self,
        filter: impl Into<String>,
        state: &Rc<RefCell<S>>,
        mut handler: F,
    ) -> SubscriptionId
    where
        S: 'static,
        T: Payload + 'static,
        F: FnMut(&mut S, &str, T) + 'static,
    {
        let weak: Weak<RefCell<S>> = Rc::downgrade(state);
        self.subscribe_typed(filter, move |topic, msg: T| {
            if let Some(state) = weak.upgrade() {
                handler(&mut state.borrow_mut(), topic, msg);
            }
        })
    }

    /// Stop further callbacks for `id`. Returns `false` if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver one message; returns how many callbacks it reached.
    pub fn dispatch(&mut self, topic: &str, payload: &[u8]) -> usize {
        let mut delivered = 0;
        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|s| topic_matches(&s.filter, topic))
        {
            (sub.handler)(topic, payload);
            delivered += 1;
        }
        if delivered == 0 {
            self.dropped += 1;
        }
        delivered
    }

    /// Distinct active filters, in registration order.
    pub fn filters(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for s in &self.subscriptions {
            if !out.contains(&s.filter) {
                out.push(s.filter.clone());
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliveries that matched no subscription.
    pub fn unrouted(&self) -> u64 {
        self.dropped
    }
}

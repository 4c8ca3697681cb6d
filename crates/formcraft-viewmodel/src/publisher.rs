//! A narrow publish/subscribe primitive keyed by property name, in place
//! of an ambient observer pattern: subscribers register against one
//! named property and are called with no arguments when it changes,
//! re-reading whatever they need from the view-model themselves.

use std::collections::HashMap;
use std::hash::Hash;

pub type Subscriber = Box<dyn Fn() + Send>;

pub struct PropertyPublisher<K> {
    subscribers: HashMap<K, Vec<Subscriber>>,
}

impl<K: Eq + Hash> Default for PropertyPublisher<K> {
    fn default() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> PropertyPublisher<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, property: K, subscriber: Subscriber) {
        self.subscribers.entry(property).or_default().push(subscriber);
    }

    pub fn notify(&self, property: &K) {
        if let Some(subs) = self.subscribers.get(property) {
            for sub in subs {
                sub();
            }
        }
    }

    pub fn notify_all(&self, properties: &[K])
    where
        K: Clone,
    {
        for property in properties {
            self.notify(property);
        }
    }

    /// Clears every subscription. Called by `dispose()`.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notify_calls_every_subscriber_of_that_property() {
        let mut publisher = PropertyPublisher::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = count.clone();
        publisher.subscribe("formula_text", Box::new(move || {
            c1.fetch_add(1, Ordering::SeqCst);
        }));
        let c2 = count.clone();
        publisher.subscribe("formula_text", Box::new(move || {
            c2.fetch_add(10, Ordering::SeqCst);
        }));
        publisher.subscribe("is_valid", Box::new(|| panic!("wrong property notified")));

        publisher.notify(&"formula_text");
        assert_eq!(count.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn clear_drops_all_subscriptions() {
        let mut publisher = PropertyPublisher::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        publisher.subscribe("x", Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        publisher.clear();
        publisher.notify(&"x");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}

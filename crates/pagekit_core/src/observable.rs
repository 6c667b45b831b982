//! Observable values
//!
//! An [`Observable<T>`] is a value with exactly one writer (whoever holds
//! `&mut`) and any number of subscribers. Every effective change bumps a
//! version counter and invokes subscribers synchronously, in subscription
//! order, on the writer's thread.
//!
//! Writing an equal value is not a change: subscribers are not called and the
//! version stays the same.
//!
//! ```ignore
//! use pagekit_core::Observable;
//!
//! let mut page = Observable::new(0usize);
//! let id = page.subscribe(|page| println!("page is now {page}"));
//!
//! assert_eq!(page.set(1), Some(0));
//! assert_eq!(page.set(1), None);
//!
//! page.unsubscribe(id);
//! ```

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered subscriber
    pub struct SubscriptionId;
}

type Subscriber<T> = Box<dyn FnMut(&T) + Send>;

/// A single-writer value with change notification
pub struct Observable<T> {
    value: T,
    version: u64,
    subscribers: SlotMap<SubscriptionId, Subscriber<T>>,
}

impl<T: PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            version: 0,
            subscribers: SlotMap::with_key(),
        }
    }

    /// Borrow the current value
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of effective changes since creation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value, notifying subscribers if it changed
    ///
    /// Returns the previous value when a change happened.
    pub fn set(&mut self, value: T) -> Option<T> {
        if self.value == value {
            return None;
        }

        let previous = std::mem::replace(&mut self.value, value);
        self.version += 1;
        self.notify();
        Some(previous)
    }

    /// Mutate the value in place, notifying if the result differs
    pub fn update<F>(&mut self, f: F) -> bool
    where
        T: Clone,
        F: FnOnce(&mut T),
    {
        let mut next = self.value.clone();
        f(&mut next);
        self.set(next).is_some()
    }

    /// Register a subscriber called with the new value after each change
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.subscribers.insert(Box::new(subscriber))
    }

    /// Remove a subscriber, returning whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Drop every subscriber (and whatever state their closures captured)
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    fn notify(&mut self) {
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.value);
        }
    }
}

impl<T: Copy + PartialEq> Observable<T> {
    /// Copy out the current value
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: Default + PartialEq> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

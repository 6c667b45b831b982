//! Active page store
//!
//! Page content often needs to know which page is active without
//! re-rendering the whole pager. The store holds the active index on the
//! application thread and notifies listeners only on actual changes.

use pagekit_core::{Observable, SubscriptionId};

use crate::position::is_page_in_range;

/// Handle returned by [`ActivePageStore::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActivePageSubscription(SubscriptionId);

/// Active page index with change listeners
#[derive(Debug)]
pub struct ActivePageStore {
    page: Observable<usize>,
}

impl ActivePageStore {
    pub fn new(page: usize) -> Self {
        Self {
            page: Observable::new(page),
        }
    }

    pub fn get(&self) -> usize {
        self.page.value()
    }

    /// Store a new active page; returns whether it changed
    pub fn set(&mut self, page: usize) -> bool {
        self.page.set(page).is_some()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ActivePageSubscription
    where
        F: FnMut(usize) + Send + 'static,
    {
        let mut listener = listener;
        ActivePageSubscription(self.page.subscribe(move |page| listener(*page)))
    }

    pub fn unsubscribe(&mut self, subscription: ActivePageSubscription) -> bool {
        self.page.unsubscribe(subscription.0)
    }

    pub fn clear(&mut self) {
        self.page.clear_subscribers();
    }

    /// Signed distance of `page_index` from the active page
    pub fn relative_index(&self, page_index: usize) -> i64 {
        relative_index(page_index, self.get())
    }
}

impl Default for ActivePageStore {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Signed distance of `page_index` from `active_page`
pub fn relative_index(page_index: usize, active_page: usize) -> i64 {
    page_index as i64 - active_page as i64
}

/// Whether `page_index` lies within `window` pages of `active_page`
pub fn is_within_window(page_index: usize, active_page: usize, window: usize) -> bool {
    is_page_in_range(page_index, active_page, window)
}

/// Onscreen flag that stays set once it has been set
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OnscreenLatch {
    latched: bool,
}

impl OnscreenLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current onscreen flag, returning the latched value
    pub fn update(&mut self, is_onscreen: bool) -> bool {
        self.latched |= is_onscreen;
        self.latched
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_listeners_only_see_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = ActivePageStore::new(0);

        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |page| sink.lock().push(page));

        assert!(store.set(1));
        assert!(!store.set(1));
        assert!(store.set(3));
        assert_eq!(*seen.lock(), vec![1, 3]);

        assert!(store.unsubscribe(subscription));
        store.set(0);
        assert_eq!(seen.lock().len(), 2);
        assert_eq!(store.get(), 0);
    }

    #[test]
    fn test_relative_index_and_window() {
        let store = ActivePageStore::new(2);
        assert_eq!(store.relative_index(0), -2);
        assert_eq!(store.relative_index(3), 1);
        assert!(is_within_window(3, 2, 1));
        assert!(!is_within_window(0, 2, 1));
    }

    #[test]
    fn test_onscreen_latch() {
        let mut latch = OnscreenLatch::new();
        assert!(!latch.update(false));
        assert!(latch.update(true));
        assert!(latch.update(false));
        assert!(latch.is_latched());
    }
}

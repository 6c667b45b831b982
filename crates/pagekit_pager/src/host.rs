//! Application-thread side of a pager
//!
//! [`PagerHost`] drains the engine's notifications, keeps the page
//! lifecycle and the active page store in step with them, and invokes the
//! application's callbacks. Nothing here is touched by the animation context.

use pagekit_core::DispatchQueue;
use pagekit_gesture::Orientation;

use crate::active_page::ActivePageStore;
use crate::config::PagerConfig;
use crate::events::{PagerCallbacks, PagerEvent};
use crate::handle::PagerRef;
use crate::lifecycle::PageLifecycle;
use crate::page::{PageContext, PageKey, PageSlot};
use crate::state::ScrollState;

pub struct PagerHost {
    queue: DispatchQueue<PagerEvent>,
    lifecycle: PageLifecycle,
    active_page: ActivePageStore,
    callbacks: PagerCallbacks,
    orientation: Orientation,
    keys: Vec<PageKey>,
    scroll_state: ScrollState,
    scroll_position: Option<f32>,
}

impl PagerHost {
    pub fn new(
        config: &PagerConfig,
        keys: Vec<PageKey>,
        initial_page: usize,
        queue: DispatchQueue<PagerEvent>,
    ) -> Self {
        Self {
            lifecycle: PageLifecycle::new(config, &keys, initial_page),
            active_page: ActivePageStore::new(initial_page),
            callbacks: PagerCallbacks::default(),
            orientation: config.orientation,
            keys,
            scroll_state: ScrollState::Idle,
            scroll_position: None,
            queue,
        }
    }

    pub fn set_callbacks(&mut self, callbacks: PagerCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn callbacks_mut(&mut self) -> &mut PagerCallbacks {
        &mut self.callbacks
    }

    /// Deliver every pending notification, oldest first
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        self.drain().len()
    }

    /// Like [`pump`](Self::pump), returning the delivered events
    pub fn drain(&mut self) -> Vec<PagerEvent> {
        let events = self.queue.drain();
        for event in &events {
            self.handle(event.clone());
        }
        events
    }

    /// Wait for and deliver the next notification
    ///
    /// Resolves to `None` once the engine is gone.
    pub async fn next_event(&mut self) -> Option<PagerEvent> {
        let event = self.queue.next().await?;
        self.handle(event.clone());
        Some(event)
    }

    /// Advance mount fades by `dt` seconds
    pub fn tick(&mut self, dt: f32) -> bool {
        self.lifecycle.tick(dt)
    }

    pub fn lifecycle(&self) -> &PageLifecycle {
        &self.lifecycle
    }

    pub fn active_page(&self) -> usize {
        self.active_page.get()
    }

    pub fn active_page_store(&mut self) -> &mut ActivePageStore {
        &mut self.active_page
    }

    pub fn keys(&self) -> &[PageKey] {
        &self.keys
    }

    /// Last scroll state reported by the engine
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll_state
    }

    /// Last display position reported by the engine
    pub fn scroll_position(&self) -> Option<f32> {
        self.scroll_position
    }

    pub fn page_context(&self, index: usize) -> Option<PageContext> {
        self.lifecycle.page_context(index, self.orientation)
    }

    /// Render snapshot of every page
    ///
    /// Empty while the page size is unknown, so nothing renders before the
    /// first measurement when no size estimate is configured.
    pub fn slots(&self, pager: &PagerRef) -> Vec<PageSlot> {
        pager.with_engine(|engine| {
            if !engine.is_ready() {
                return Vec::new();
            }
            let transforms = engine.page_transforms();
            self.lifecycle
                .entries()
                .map(|entry| PageSlot {
                    key: entry.key.clone(),
                    index: entry.index,
                    is_mounted: entry.is_mounted,
                    is_onscreen: entry.is_onscreen,
                    is_attached: engine.is_page_attached(entry.index),
                    mount_opacity: self.lifecycle.mount_opacity(entry.index),
                    transform: transforms.get(entry.index).copied().unwrap_or_default(),
                })
                .collect()
        })
    }

    fn handle(&mut self, event: PagerEvent) {
        match &event {
            PagerEvent::PageSelected { page } => {
                self.lifecycle.on_page_selected(*page);
                self.active_page.set(*page);
            }
            PagerEvent::ChildrenChanged { keys, current_page } => {
                self.lifecycle.reconcile(keys, *current_page);
                self.keys = keys.clone();
            }
            PagerEvent::ScrollStateChanged { state } => self.scroll_state = *state,
            PagerEvent::PageScroll { position } => self.scroll_position = Some(*position),
            PagerEvent::DragStart
            | PagerEvent::DragEnd
            | PagerEvent::InitialMeasure
            | PagerEvent::Overscroll { .. } => {}
        }

        tracing::trace!(?event, "pager event");
        self.callbacks.emit(&event);
    }
}

impl std::fmt::Debug for PagerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerHost")
            .field("active_page", &self.active_page.get())
            .field("pages", &self.keys.len())
            .field("scroll_state", &self.scroll_state)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

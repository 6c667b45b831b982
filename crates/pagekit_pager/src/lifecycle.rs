//! Page lifecycle
//!
//! Application-thread bookkeeping of which pages are mounted and which are
//! onscreen. Updated from page-selected notifications; never reads the
//! engine's state directly.
//!
//! - Mounting is monotonic: once a page mounts it stays mounted for as long
//!   as its key is among the children.
//! - The onscreen flag follows the active page freely.
//! - A page mounting after the first render fades in over `mount_fade_ms`.

use indexmap::IndexMap;
use pagekit_animation::{AnimatedValue, Easing};
use pagekit_gesture::Orientation;

use crate::config::PagerConfig;
use crate::page::{PageContext, PageEntry, PageKey};
use crate::position::is_page_in_range;

#[derive(Debug)]
struct FadedIn;

#[derive(Debug)]
struct PageRecord {
    entry: PageEntry,
    mount_opacity: AnimatedValue<FadedIn>,
}

/// Mount and onscreen state of every child
#[derive(Debug)]
pub struct PageLifecycle {
    lazy: bool,
    lazy_page_limit: usize,
    track_onscreen: bool,
    track_onscreen_page_limit: usize,
    mount_fade_ms: f32,
    active_page: usize,
    records: IndexMap<PageKey, PageRecord>,
}

impl PageLifecycle {
    /// Initial state, computed straight from `active_page`
    pub fn new(config: &PagerConfig, keys: &[PageKey], active_page: usize) -> Self {
        let mut lifecycle = Self {
            lazy: config.lazy,
            lazy_page_limit: config.lazy_page_limit,
            track_onscreen: config.track_onscreen,
            track_onscreen_page_limit: config.track_onscreen_page_limit,
            mount_fade_ms: config.mount_fade_ms,
            active_page,
            records: IndexMap::with_capacity(keys.len()),
        };
        for (index, key) in keys.iter().enumerate() {
            let record = lifecycle.fresh_record(key.clone(), index);
            lifecycle.records.insert(key.clone(), record);
        }
        lifecycle
    }

    pub fn active_page(&self) -> usize {
        self.active_page
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries in page order
    pub fn entries(&self) -> impl Iterator<Item = &PageEntry> + '_ {
        self.records.values().map(|record| &record.entry)
    }

    pub fn entry(&self, index: usize) -> Option<&PageEntry> {
        self.records.get_index(index).map(|(_, record)| &record.entry)
    }

    pub fn entry_for_key(&self, key: &PageKey) -> Option<&PageEntry> {
        self.records.get(key).map(|record| &record.entry)
    }

    /// Fade-in progress of a page, `0.0` while unmounted
    pub fn mount_opacity(&self, index: usize) -> f32 {
        self.records
            .get_index(index)
            .map(|(_, record)| record.mount_opacity.value())
            .unwrap_or(0.0)
    }

    pub fn mounted_count(&self) -> usize {
        self.entries().filter(|entry| entry.is_mounted).count()
    }

    /// Capability struct handed to the content of page `index`
    pub fn page_context(&self, index: usize, orientation: Orientation) -> Option<PageContext> {
        self.entry(index).map(|entry| PageContext {
            page_index: index,
            is_onscreen: entry.is_onscreen,
            active_page_index: self.active_page,
            orientation,
        })
    }

    /// React to a new active page
    pub fn on_page_selected(&mut self, page: usize) {
        self.active_page = page;

        let (lazy, lazy_limit) = (self.lazy, self.lazy_page_limit);
        let (track, track_limit) = (self.track_onscreen, self.track_onscreen_page_limit);
        let fade_ms = self.mount_fade_ms;

        for record in self.records.values_mut() {
            let entry = &mut record.entry;

            if lazy && !entry.is_mounted && is_page_in_range(entry.index, page, lazy_limit) {
                tracing::debug!(key = %entry.key, index = entry.index, "page mounted");
                entry.is_mounted = true;
                record
                    .mount_opacity
                    .timing_to(1.0, fade_ms, Easing::Linear, FadedIn);
            }

            if track {
                entry.is_onscreen = is_page_in_range(entry.index, page, track_limit);
            }
        }
    }

    /// Rebuild records for a new children list
    ///
    /// Surviving keys keep their mount state; vanished keys are dropped and
    /// new keys are evaluated against `current_page`.
    pub fn reconcile(&mut self, keys: &[PageKey], current_page: usize) {
        let mut previous = std::mem::take(&mut self.records);
        self.active_page = current_page;

        for (index, key) in keys.iter().enumerate() {
            let record = match previous.swap_remove(key) {
                Some(mut record) => {
                    record.entry.index = index;
                    record
                }
                None => self.fresh_record(key.clone(), index),
            };
            self.records.insert(key.clone(), record);
        }

        if !previous.is_empty() {
            tracing::debug!(removed = previous.len(), "dropped page entries");
        }

        self.on_page_selected(current_page);
    }

    /// Advance mount fades; returns whether any is still running
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut active = false;
        for record in self.records.values_mut() {
            if record.mount_opacity.tick(dt).is_some() {
                tracing::trace!(key = %record.entry.key, "page faded in");
            }
            active |= record.mount_opacity.is_animating();
        }
        active
    }

    fn fresh_record(&self, key: PageKey, index: usize) -> PageRecord {
        let is_mounted = !self.lazy || is_page_in_range(index, self.active_page, self.lazy_page_limit);
        let is_onscreen = !self.track_onscreen
            || is_page_in_range(index, self.active_page, self.track_onscreen_page_limit);

        PageRecord {
            entry: PageEntry {
                key,
                index,
                is_mounted,
                is_onscreen,
            },
            mount_opacity: AnimatedValue::new(if is_mounted { 1.0 } else { 0.0 }),
        }
    }
}

//! Page records and the values handed to page content

use std::fmt;

use pagekit_gesture::Orientation;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::style::PageTransform;

/// Stable identity of a page across children updates
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keys `"0"`, `"1"`, ... for children without explicit identity
    pub fn indexed(count: usize) -> Vec<PageKey> {
        (0..count).map(PageKey::from).collect()
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PageKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<usize> for PageKey {
    fn from(index: usize) -> Self {
        Self(index.to_string())
    }
}

/// Drop repeated keys, keeping the first occurrence
pub fn dedupe_keys(keys: Vec<PageKey>) -> Vec<PageKey> {
    let mut seen = FxHashSet::default();
    let before = keys.len();
    let unique: Vec<PageKey> = keys.into_iter().filter(|key| seen.insert(key.clone())).collect();
    if unique.len() != before {
        tracing::warn!(dropped = before - unique.len(), "duplicate page keys ignored");
    }
    unique
}

/// Lifecycle record of one child
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEntry {
    pub key: PageKey,
    /// Position among the current children
    pub index: usize,
    /// Content instantiated; never reverts to `false`
    pub is_mounted: bool,
    /// Inside the onscreen window
    pub is_onscreen: bool,
}

/// Capabilities passed to page content when it renders
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageContext {
    pub page_index: usize,
    pub is_onscreen: bool,
    pub active_page_index: usize,
    pub orientation: Orientation,
}

impl PageContext {
    /// Signed distance from the active page
    pub fn relative_index(&self) -> i64 {
        self.page_index as i64 - self.active_page_index as i64
    }

    pub fn is_active(&self) -> bool {
        self.page_index == self.active_page_index
    }
}

/// Everything needed to render one page slot in a frame
#[derive(Clone, Debug, PartialEq)]
pub struct PageSlot {
    pub key: PageKey,
    pub index: usize,
    pub is_mounted: bool,
    pub is_onscreen: bool,
    /// Still attached to the render tree (clipping)
    pub is_attached: bool,
    /// Mount fade progress, 1.0 once fully shown
    pub mount_opacity: f32,
    pub transform: PageTransform,
}

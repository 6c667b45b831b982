//! Position model
//!
//! Pure arithmetic relating raw offsets, continuous scroll positions and page
//! indices. Page `p` rests at offset `p * -page_size`; the scroll position is
//! the offset expressed in pages, `-offset / page_size`.

use serde::{Deserialize, Serialize};

/// Distance (in pages) under which a position counts as sitting on a page
pub const POSITION_EPSILON: f32 = 1e-4;

/// Offset at which `page` rests
pub fn get_page_offset(page: usize, page_size: f32) -> f32 {
    page as f32 * -page_size
}

/// Continuous scroll position for `offset`, `None` before measurement
pub fn scroll_position_from_offset(offset: f32, page_size: f32) -> Option<f32> {
    if page_size > 0.0 && offset.is_finite() {
        Some(-offset / page_size)
    } else {
        None
    }
}

/// A scroll position split into page and fraction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    /// Index of the page at or before the position (negative in overscroll)
    pub position: i64,
    /// Fraction of the way to the next page, in `[0, 1)`
    pub offset: f32,
}

impl ScrollPosition {
    /// Split a continuous position into `floor` and fractional part
    ///
    /// Positions within [`POSITION_EPSILON`] of an integer snap onto it, so a
    /// settle that lands on a page always reports a fraction of exactly `0`.
    pub fn from_position(position: f32) -> Self {
        let mut page = position.floor();
        let mut fraction = position - page;

        if fraction >= 1.0 - POSITION_EPSILON {
            page += 1.0;
            fraction = 0.0;
        } else if fraction <= POSITION_EPSILON {
            fraction = 0.0;
        }

        Self {
            position: page as i64,
            offset: fraction,
        }
    }

    /// Whether the position sits exactly on a page
    pub fn is_on_page(&self) -> bool {
        self.offset == 0.0
    }
}

/// Decompose a raw (or display) offset, `None` before measurement
pub fn derive_scroll_position(offset: f32, page_size: f32) -> Option<ScrollPosition> {
    scroll_position_from_offset(offset, page_size).map(ScrollPosition::from_position)
}

/// How far `position` lies outside `[0, max_position]`, in pages
///
/// Negative before the first page, positive past the last, zero inside.
pub fn get_overscroll_offset(position: f32, max_position: f32) -> f32 {
    if position < 0.0 {
        position
    } else if position > max_position {
        position - max_position
    } else {
        0.0
    }
}

/// Clamp a possibly out-of-range page request into `[0, page_count - 1]`
pub fn clamp_page(page: i64, page_count: usize) -> usize {
    if page_count == 0 || page <= 0 {
        return 0;
    }
    (page as usize).min(page_count - 1)
}

/// Whether `page` is within `limit` pages of `active`
pub fn is_page_in_range(page: usize, active: usize, limit: usize) -> bool {
    page.abs_diff(active) <= limit
}

//! Layout tracker
//!
//! Tracks the container's size along the scroll axis and the resulting page
//! size (`measured + page_margin`). With an estimated size the page size is
//! known from the start; otherwise it stays unknown (and pages are not
//! rendered) until the first measurement arrives.

use pagekit_gesture::{Bounds, Orientation};

#[derive(Clone, Debug)]
pub struct LayoutTracker {
    orientation: Orientation,
    page_margin: f32,
    estimated: Option<f32>,
    measured: Option<(f32, f32)>,
    page_size: f32,
}

impl LayoutTracker {
    pub fn new(orientation: Orientation, page_margin: f32, estimated: Option<f32>) -> Self {
        let page_size = estimated.map(|size| size + page_margin).unwrap_or(0.0);
        Self {
            orientation,
            page_margin,
            estimated,
            measured: None,
            page_size,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Page size along the scroll axis, `0.0` while unknown
    pub fn page_size(&self) -> f32 {
        self.page_size
    }

    /// Whether a page size is available (measured or estimated)
    pub fn is_known(&self) -> bool {
        self.page_size > 0.0
    }

    /// Whether a real measurement has arrived
    pub fn is_measured(&self) -> bool {
        self.measured.is_some()
    }

    /// Last measured `(width, height)`
    pub fn container_size(&self) -> Option<(f32, f32)> {
        self.measured
    }

    pub fn content_size(&self, page_count: usize) -> f32 {
        page_count as f32 * self.page_size
    }

    /// Area in which touches may start
    ///
    /// With only an estimate the cross axis is unbounded.
    pub fn bounds(&self) -> Option<Bounds> {
        match (self.measured, self.estimated) {
            (Some((width, height)), _) => Some(Bounds::new(0.0, 0.0, width, height)),
            (None, Some(size)) => Some(match self.orientation {
                Orientation::Horizontal => Bounds::new(0.0, 0.0, size, f32::INFINITY),
                Orientation::Vertical => Bounds::new(0.0, 0.0, f32::INFINITY, size),
            }),
            (None, None) => None,
        }
    }

    /// Record a container measurement
    ///
    /// Returns the new page size when it changed.
    pub fn measure(&mut self, width: f32, height: f32) -> Option<f32> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(height) {
            tracing::warn!(width, height, "ignoring invalid container measurement");
            return None;
        }

        self.measured = Some((width, height));
        let page_size = self.orientation.main_extent(width, height) + self.page_margin;
        if page_size == self.page_size {
            return None;
        }

        tracing::debug!(from = self.page_size, to = page_size, "page size changed");
        self.page_size = page_size;
        Some(page_size)
    }
}

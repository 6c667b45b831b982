//! Scroll offset interpolators
//!
//! An interpolator maps the raw scroll position (in pages) to the position
//! used for display. The raw offset driving physics and hit-testing is never
//! modified; only what gets rendered is.

use pagekit_gesture::Orientation;
use serde::{Deserialize, Serialize};

use crate::position::get_overscroll_offset;

/// Edge of the page range being overscrolled
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverscrollSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl OverscrollSide {
    /// Side for a signed overscroll amount, `None` when inside the range
    pub fn from_overscroll(overscroll: f32, orientation: Orientation) -> Option<Self> {
        let leading = if overscroll < 0.0 {
            true
        } else if overscroll > 0.0 {
            false
        } else {
            return None;
        };

        Some(match (orientation, leading) {
            (Orientation::Horizontal, true) => OverscrollSide::Left,
            (Orientation::Horizontal, false) => OverscrollSide::Right,
            (Orientation::Vertical, true) => OverscrollSide::Top,
            (Orientation::Vertical, false) => OverscrollSide::Bottom,
        })
    }
}

/// Input to an interpolator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollOffsetParams {
    /// Raw scroll position in pages
    pub scroll_position: f32,
    pub page_count: usize,
    pub orientation: Orientation,
}

impl ScrollOffsetParams {
    /// Position of the last page
    pub fn max_position(&self) -> f32 {
        self.page_count.saturating_sub(1) as f32
    }
}

/// Output of an interpolator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolatedOffset {
    /// Display position in pages
    pub position: f32,
    /// Set when the overscroll threshold side effect should fire
    pub threshold_reached: Option<OverscrollSide>,
}

impl InterpolatedOffset {
    pub fn plain(position: f32) -> Self {
        Self {
            position,
            threshold_reached: None,
        }
    }
}

/// Maps raw scroll position to display position
///
/// Runs in the animation context on every offset change.
pub trait ScrollOffsetInterpolator: Send {
    fn interpolate(&mut self, params: &ScrollOffsetParams) -> InterpolatedOffset;

    /// Called when a drag begins
    fn on_pan_start(&mut self) {}
}

/// Default interpolator: clamp into the page range
#[derive(Clone, Copy, Debug, Default)]
pub struct ClampInterpolator;

impl ScrollOffsetInterpolator for ClampInterpolator {
    fn interpolate(&mut self, params: &ScrollOffsetParams) -> InterpolatedOffset {
        InterpolatedOffset::plain(params.scroll_position.clamp(0.0, params.max_position()))
    }
}

/// Bounce interpolator settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BounceConfig {
    /// 0 moves freely past the edge, 1 does not move at all
    #[serde(default = "default_resistance_factor")]
    pub resistance_factor: f32,
    /// Overscroll (in pages) beyond which the threshold side effect fires
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    /// Fire at most once per drag instead of once per excursion
    #[serde(default)]
    pub trigger_once_per_gesture: bool,
}

fn default_resistance_factor() -> f32 {
    0.7
}

fn default_threshold() -> f32 {
    0.3
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self {
            resistance_factor: default_resistance_factor(),
            threshold: default_threshold(),
            trigger_once_per_gesture: false,
        }
    }
}

/// Resistance-dampened overscroll with a threshold side effect
#[derive(Clone, Debug, Default)]
pub struct BounceInterpolator {
    config: BounceConfig,
    fired: bool,
}

impl BounceInterpolator {
    pub fn new(config: BounceConfig) -> Self {
        Self {
            config,
            fired: false,
        }
    }

    pub fn config(&self) -> &BounceConfig {
        &self.config
    }
}

impl ScrollOffsetInterpolator for BounceInterpolator {
    fn interpolate(&mut self, params: &ScrollOffsetParams) -> InterpolatedOffset {
        let position = params.scroll_position;
        let overscroll = get_overscroll_offset(position, params.max_position());

        if !self.config.trigger_once_per_gesture && overscroll == 0.0 {
            self.fired = false;
        }

        let threshold_reached = if !self.fired && overscroll.abs() > self.config.threshold {
            self.fired = true;
            OverscrollSide::from_overscroll(overscroll, params.orientation)
        } else {
            None
        };

        InterpolatedOffset {
            position: position - overscroll * self.config.resistance_factor,
            threshold_reached,
        }
    }

    fn on_pan_start(&mut self) {
        self.fired = false;
    }
}

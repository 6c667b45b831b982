//! Hit slop: which part of the container may start a gesture

use serde::{Deserialize, Serialize};

use crate::input::Point;

/// Per-side adjustment of the touchable area
///
/// Positive values extend the area beyond the container bounds, negative
/// values shrink it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitSlop {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl HitSlop {
    /// Same adjustment on every side
    pub fn uniform(amount: f32) -> Self {
        Self {
            left: amount,
            right: amount,
            top: amount,
            bottom: amount,
        }
    }

    /// Separate horizontal and vertical adjustments
    pub fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        }
    }
}

/// Container bounds in the coordinate space of touch samples
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `point` falls inside the bounds adjusted by `slop`
    pub fn contains(&self, point: Point, slop: &HitSlop) -> bool {
        let left = self.x - slop.left;
        let right = self.x + self.width + slop.right;
        let top = self.y - slop.top;
        let bottom = self.y + self.height + slop.bottom;
        point.x >= left && point.x <= right && point.y >= top && point.y <= bottom
    }
}

//! Gesture input types

use serde::{Deserialize, Serialize};

/// A 2D point or displacement
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Scroll axis of a pager (or of a nested scrollable)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Component of `p` along the scroll axis
    pub fn main_axis(self, p: Point) -> f32 {
        match self {
            Orientation::Horizontal => p.x,
            Orientation::Vertical => p.y,
        }
    }

    /// Component of `p` across the scroll axis
    pub fn cross_axis(self, p: Point) -> f32 {
        match self {
            Orientation::Horizontal => p.y,
            Orientation::Vertical => p.x,
        }
    }

    /// Pick the main-axis extent of a `(width, height)` pair
    pub fn main_extent(self, width: f32, height: f32) -> f32 {
        match self {
            Orientation::Horizontal => width,
            Orientation::Vertical => height,
        }
    }
}

/// Raw samples delivered by the gesture source
///
/// Translations are measured from the touch-down point; velocities are in
/// units per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureInput {
    /// A finger touched down at an absolute position
    TouchDown {
        /// Position in container coordinates
        position: Point,
    },
    /// The finger moved
    Pan {
        /// Total translation since touch-down
        translation: Point,
    },
    /// The finger lifted
    Release {
        /// Total translation since touch-down
        translation: Point,
        /// Release velocity
        velocity: Point,
    },
    /// The source cancelled the touch (system gesture, interruption)
    Cancel,
}

/// Gesture lifecycle as seen by the pager, reduced to the scroll axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanEvent {
    /// The pager claimed the gesture
    Start,
    /// Main-axis translation since touch-down
    Change { translation: f32 },
    /// The claimed gesture ended
    End { translation: f32, velocity: f32 },
}
